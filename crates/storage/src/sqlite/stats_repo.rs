use chrono::NaiveDate;
use portal_core::StudyHistory;
use portal_core::model::LastStudySession;
use portal_core::stats::StudyProgress;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{db, map_study_session_row, ser};
use crate::repository::{StatsRepository, StorageError};

fn count(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("negative {field}: {v}")))
}

#[async_trait::async_trait]
impl StatsRepository for SqliteRepository {
    async fn study_history(&self) -> Result<StudyHistory, StorageError> {
        let mut tx = self.pool.begin().await.map_err(db)?;

        let reviews = sqlx::query(
            r"
            SELECT COUNT(*) AS total,
                   COALESCE(SUM(CASE WHEN correct THEN 1 ELSE 0 END), 0) AS correct
            FROM word_review_items
            ",
        )
        .fetch_one(&mut *tx)
        .await
        .map_err(db)?;

        let sessions = sqlx::query(
            r"
            SELECT COUNT(*) AS total, COUNT(DISTINCT group_id) AS active_groups
            FROM study_sessions
            ",
        )
        .fetch_one(&mut *tx)
        .await
        .map_err(db)?;

        // created_at is stored as RFC 3339 UTC text, so its date prefix is the UTC day.
        let day_rows = sqlx::query(
            r"
            SELECT DISTINCT substr(created_at, 1, 10) AS day
            FROM study_sessions
            ORDER BY day
            ",
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(db)?;

        tx.commit().await.map_err(db)?;

        let mut days = Vec::with_capacity(day_rows.len());
        for row in &day_rows {
            let day: String = row.try_get("day").map_err(ser)?;
            days.push(day.parse::<NaiveDate>().map_err(ser)?);
        }

        Ok(StudyHistory {
            total_reviews: count("total_reviews", reviews.try_get("total").map_err(ser)?)?,
            correct_reviews: count("correct_reviews", reviews.try_get("correct").map_err(ser)?)?,
            total_sessions: count("total_sessions", sessions.try_get("total").map_err(ser)?)?,
            active_groups: count("active_groups", sessions.try_get("active_groups").map_err(ser)?)?,
            session_days: days,
        })
    }

    async fn study_progress(&self) -> Result<StudyProgress, StorageError> {
        let row = sqlx::query(
            r"
            SELECT
                (SELECT COUNT(DISTINCT word_id) FROM word_review_items) AS studied,
                (SELECT COUNT(*) FROM words) AS available
            ",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db)?;

        Ok(StudyProgress {
            total_words_studied: count("studied", row.try_get("studied").map_err(ser)?)?,
            total_available_words: count("available", row.try_get("available").map_err(ser)?)?,
        })
    }

    async fn last_study_session(&self) -> Result<Option<LastStudySession>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT s.id, s.group_id, s.study_activity_id, s.created_at, g.name AS group_name
            FROM study_sessions s
            JOIN groups g ON g.id = s.group_id
            ORDER BY s.created_at DESC, s.id DESC
            LIMIT 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(db)?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(LastStudySession {
            session: map_study_session_row(&row)?,
            group_name: row.try_get("group_name").map_err(ser)?,
        }))
    }
}
