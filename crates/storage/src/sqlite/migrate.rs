use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

const SCHEMA_V1: &[&str] = &[
    r"
        CREATE TABLE IF NOT EXISTS words (
            id INTEGER PRIMARY KEY,
            malay TEXT NOT NULL,
            jawi TEXT NOT NULL,
            english TEXT NOT NULL,
            parts TEXT NOT NULL DEFAULT '{}'
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS groups (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            words_count INTEGER NOT NULL DEFAULT 0 CHECK (words_count >= 0),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS word_groups (
            word_id INTEGER NOT NULL,
            group_id INTEGER NOT NULL,
            PRIMARY KEY (word_id, group_id),
            FOREIGN KEY (word_id) REFERENCES words(id) ON DELETE CASCADE,
            FOREIGN KEY (group_id) REFERENCES groups(id) ON DELETE CASCADE
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS study_activities (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            url TEXT NOT NULL
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS study_sessions (
            id INTEGER PRIMARY KEY,
            group_id INTEGER NOT NULL,
            study_activity_id INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (group_id) REFERENCES groups(id),
            FOREIGN KEY (study_activity_id) REFERENCES study_activities(id) ON DELETE CASCADE
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS word_review_items (
            id INTEGER PRIMARY KEY,
            word_id INTEGER NOT NULL,
            study_session_id INTEGER NOT NULL,
            correct INTEGER NOT NULL CHECK (correct IN (0, 1)),
            created_at TEXT NOT NULL,
            FOREIGN KEY (word_id) REFERENCES words(id) ON DELETE CASCADE,
            FOREIGN KEY (study_session_id) REFERENCES study_sessions(id) ON DELETE CASCADE
        );
    ",
    r"
        CREATE INDEX IF NOT EXISTS idx_word_groups_group
            ON word_groups (group_id, word_id);
    ",
    r"
        CREATE INDEX IF NOT EXISTS idx_study_sessions_group
            ON study_sessions (group_id, id);
    ",
    r"
        CREATE INDEX IF NOT EXISTS idx_study_sessions_activity
            ON study_sessions (study_activity_id, id);
    ",
    r"
        CREATE INDEX IF NOT EXISTS idx_study_sessions_created
            ON study_sessions (created_at);
    ",
    r"
        CREATE INDEX IF NOT EXISTS idx_review_items_session
            ON word_review_items (study_session_id, id);
    ",
    r"
        CREATE INDEX IF NOT EXISTS idx_review_items_word
            ON word_review_items (word_id);
    ",
];

/// Runs a single, consolidated migration for the current schema.
///
/// Creates words, groups with their memberships, study activities, study
/// sessions, review items, and the indexes the listings rely on.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: full schema.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        for statement in SCHEMA_V1 {
            sqlx::query(*statement).execute(&mut *tx).await?;
        }

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(version = 1, "applied schema migration");
    }

    Ok(())
}
