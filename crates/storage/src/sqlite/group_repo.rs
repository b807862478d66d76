use chrono::{DateTime, Utc};
use portal_core::Page;
use portal_core::model::{Group, GroupId, GroupName, Word, WordId};
use sqlx::{Sqlite, Transaction};

use super::SqliteRepository;
use super::mapping::{
    commit_failed, db, id_i64, map_group_row, map_rows, map_word_row, page_bounds,
};
use crate::repository::{GroupRepository, StorageError};

const SELECT_GROUP: &str = r"
    SELECT id, name, words_count, created_at, updated_at
    FROM groups
    WHERE id = ?1
";

async fn group_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    group_id: i64,
) -> Result<Option<Group>, StorageError> {
    let row = sqlx::query(SELECT_GROUP)
        .bind(group_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(db)?;
    row.as_ref().map(map_group_row).transpose()
}

/// Recount memberships and stamp `updated_at`, returning the fresh row.
async fn refresh_words_count(
    tx: &mut Transaction<'_, Sqlite>,
    group_id: i64,
    at: DateTime<Utc>,
) -> Result<Group, StorageError> {
    sqlx::query(
        r"
        UPDATE groups
        SET words_count = (SELECT COUNT(*) FROM word_groups WHERE group_id = ?1),
            updated_at = ?2
        WHERE id = ?1
        ",
    )
    .bind(group_id)
    .bind(at)
    .execute(&mut **tx)
    .await
    .map_err(db)?;

    group_in_tx(tx, group_id).await?.ok_or(StorageError::NotFound)
}

#[async_trait::async_trait]
impl GroupRepository for SqliteRepository {
    async fn insert_group(
        &self,
        name: &GroupName,
        created_at: DateTime<Utc>,
    ) -> Result<Group, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO groups (name, words_count, created_at, updated_at)
            VALUES (?1, 0, ?2, ?2)
            ",
        )
        .bind(name.as_str())
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;

        let id = u64::try_from(res.last_insert_rowid())
            .map_err(|_| StorageError::Serialization("group id sign overflow".into()))?;
        Ok(Group::new(
            GroupId::new(id),
            name.clone(),
            0,
            created_at,
            created_at,
        ))
    }

    async fn get_group(&self, id: GroupId) -> Result<Option<Group>, StorageError> {
        let row = sqlx::query(SELECT_GROUP)
            .bind(id_i64("group id", id.value())?)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;

        row.as_ref().map(map_group_row).transpose()
    }

    async fn list_groups(&self, page: Page) -> Result<Vec<Group>, StorageError> {
        let (limit, offset) = page_bounds(page);
        let rows = sqlx::query(
            r"
            SELECT id, name, words_count, created_at, updated_at
            FROM groups
            ORDER BY id ASC
            LIMIT ?1 OFFSET ?2
            ",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;

        map_rows(&rows, map_group_row)
    }

    async fn update_group(&self, group: &Group) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            UPDATE groups
            SET name = ?2, updated_at = ?3
            WHERE id = ?1
            ",
        )
        .bind(id_i64("group id", group.id().value())?)
        .bind(group.name().as_str())
        .bind(group.updated_at())
        .execute(&self.pool)
        .await
        .map_err(db)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_group(&self, id: GroupId) -> Result<(), StorageError> {
        let group_id = id_i64("group id", id.value())?;
        let mut tx = self.pool.begin().await.map_err(db)?;

        if group_in_tx(&mut tx, group_id).await?.is_none() {
            return Err(StorageError::NotFound);
        }

        sqlx::query(
            r"
            DELETE FROM word_review_items
            WHERE study_session_id IN (SELECT id FROM study_sessions WHERE group_id = ?1)
            ",
        )
        .bind(group_id)
        .execute(&mut *tx)
        .await
        .map_err(db)?;

        sqlx::query("DELETE FROM study_sessions WHERE group_id = ?1")
            .bind(group_id)
            .execute(&mut *tx)
            .await
            .map_err(db)?;

        sqlx::query("DELETE FROM word_groups WHERE group_id = ?1")
            .bind(group_id)
            .execute(&mut *tx)
            .await
            .map_err(db)?;

        sqlx::query("DELETE FROM groups WHERE id = ?1")
            .bind(group_id)
            .execute(&mut *tx)
            .await
            .map_err(db)?;

        tx.commit().await.map_err(commit_failed)?;
        tracing::debug!(group_id = %id, "deleted group with its sessions");
        Ok(())
    }

    async fn list_group_words(&self, id: GroupId, page: Page) -> Result<Vec<Word>, StorageError> {
        let (limit, offset) = page_bounds(page);
        let rows = sqlx::query(
            r"
            SELECT w.id, w.malay, w.jawi, w.english, w.parts
            FROM words w
            JOIN word_groups wg ON wg.word_id = w.id
            WHERE wg.group_id = ?1
            ORDER BY w.id ASC
            LIMIT ?2 OFFSET ?3
            ",
        )
        .bind(id_i64("group id", id.value())?)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;

        map_rows(&rows, map_word_row)
    }

    async fn add_word_to_group(
        &self,
        group_id: GroupId,
        word_id: WordId,
        at: DateTime<Utc>,
    ) -> Result<Group, StorageError> {
        let gid = id_i64("group id", group_id.value())?;
        let wid = id_i64("word id", word_id.value())?;
        let mut tx = self.pool.begin().await.map_err(db)?;

        let Some(group) = group_in_tx(&mut tx, gid).await? else {
            return Err(StorageError::NotFound);
        };
        let word = sqlx::query("SELECT 1 FROM words WHERE id = ?1")
            .bind(wid)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db)?;
        if word.is_none() {
            return Err(StorageError::MissingReference {
                entity: "word",
                id: word_id.value(),
            });
        }

        let res = sqlx::query(
            r"
            INSERT INTO word_groups (word_id, group_id)
            VALUES (?1, ?2)
            ON CONFLICT(word_id, group_id) DO NOTHING
            ",
        )
        .bind(wid)
        .bind(gid)
        .execute(&mut *tx)
        .await
        .map_err(db)?;

        if res.rows_affected() == 0 {
            return Ok(group);
        }

        let group = refresh_words_count(&mut tx, gid, at).await?;
        tx.commit().await.map_err(commit_failed)?;
        Ok(group)
    }

    async fn remove_word_from_group(
        &self,
        group_id: GroupId,
        word_id: WordId,
        at: DateTime<Utc>,
    ) -> Result<Group, StorageError> {
        let gid = id_i64("group id", group_id.value())?;
        let wid = id_i64("word id", word_id.value())?;
        let mut tx = self.pool.begin().await.map_err(db)?;

        if group_in_tx(&mut tx, gid).await?.is_none() {
            return Err(StorageError::NotFound);
        }

        let res = sqlx::query("DELETE FROM word_groups WHERE word_id = ?1 AND group_id = ?2")
            .bind(wid)
            .bind(gid)
            .execute(&mut *tx)
            .await
            .map_err(db)?;
        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        let group = refresh_words_count(&mut tx, gid, at).await?;
        tx.commit().await.map_err(commit_failed)?;
        Ok(group)
    }
}
