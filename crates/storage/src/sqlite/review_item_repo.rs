use portal_core::Page;
use portal_core::model::{ReviewItem, ReviewItemId, StudySessionId};

use super::SqliteRepository;
use super::mapping::{commit_failed, db, id_i64, map_review_item_row, map_rows, page_bounds};
use crate::repository::{NewReviewItemRecord, ReviewItemRepository, StorageError};

#[async_trait::async_trait]
impl ReviewItemRepository for SqliteRepository {
    async fn insert_review_item(
        &self,
        review: NewReviewItemRecord,
    ) -> Result<ReviewItem, StorageError> {
        let word_id = id_i64("word id", review.word_id.value())?;
        let session_id = id_i64("study session id", review.study_session_id.value())?;
        let mut tx = self.pool.begin().await.map_err(db)?;

        let session = sqlx::query("SELECT 1 FROM study_sessions WHERE id = ?1")
            .bind(session_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db)?;
        if session.is_none() {
            return Err(StorageError::MissingReference {
                entity: "study session",
                id: review.study_session_id.value(),
            });
        }

        let word = sqlx::query("SELECT 1 FROM words WHERE id = ?1")
            .bind(word_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db)?;
        if word.is_none() {
            return Err(StorageError::MissingReference {
                entity: "word",
                id: review.word_id.value(),
            });
        }

        let res = sqlx::query(
            r"
            INSERT INTO word_review_items (word_id, study_session_id, correct, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(word_id)
        .bind(session_id)
        .bind(review.correct)
        .bind(review.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db)?;

        tx.commit().await.map_err(commit_failed)?;

        let id = u64::try_from(res.last_insert_rowid())
            .map_err(|_| StorageError::Serialization("review item id sign overflow".into()))?;
        Ok(ReviewItem::new(
            ReviewItemId::new(id),
            review.word_id,
            review.study_session_id,
            review.correct,
            review.created_at,
        ))
    }

    async fn list_session_review_items(
        &self,
        study_session_id: StudySessionId,
        page: Page,
    ) -> Result<Vec<ReviewItem>, StorageError> {
        let (limit, offset) = page_bounds(page);
        let rows = sqlx::query(
            r"
            SELECT id, word_id, study_session_id, correct, created_at
            FROM word_review_items
            WHERE study_session_id = ?1
            ORDER BY id ASC
            LIMIT ?2 OFFSET ?3
            ",
        )
        .bind(id_i64("study session id", study_session_id.value())?)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;

        map_rows(&rows, map_review_item_row)
    }
}
