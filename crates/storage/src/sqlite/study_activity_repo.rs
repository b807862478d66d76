use portal_core::Page;
use portal_core::model::{StudyActivity, StudyActivityFields, StudyActivityId};

use super::SqliteRepository;
use super::mapping::{db, id_i64, map_rows, map_study_activity_row, page_bounds};
use crate::repository::{StorageError, StudyActivityRepository};

#[async_trait::async_trait]
impl StudyActivityRepository for SqliteRepository {
    async fn insert_study_activity(
        &self,
        fields: &StudyActivityFields,
    ) -> Result<StudyActivity, StorageError> {
        let res = sqlx::query("INSERT INTO study_activities (name, url) VALUES (?1, ?2)")
            .bind(fields.name())
            .bind(fields.url())
            .execute(&self.pool)
            .await
            .map_err(db)?;

        let id = u64::try_from(res.last_insert_rowid())
            .map_err(|_| StorageError::Serialization("study activity id sign overflow".into()))?;
        Ok(StudyActivity::new(StudyActivityId::new(id), fields.clone()))
    }

    async fn get_study_activity(
        &self,
        id: StudyActivityId,
    ) -> Result<Option<StudyActivity>, StorageError> {
        let row = sqlx::query("SELECT id, name, url FROM study_activities WHERE id = ?1")
            .bind(id_i64("study activity id", id.value())?)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;

        row.as_ref().map(map_study_activity_row).transpose()
    }

    async fn list_study_activities(&self, page: Page) -> Result<Vec<StudyActivity>, StorageError> {
        let (limit, offset) = page_bounds(page);
        let rows = sqlx::query(
            r"
            SELECT id, name, url
            FROM study_activities
            ORDER BY id ASC
            LIMIT ?1 OFFSET ?2
            ",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;

        map_rows(&rows, map_study_activity_row)
    }

    async fn update_study_activity(&self, activity: &StudyActivity) -> Result<(), StorageError> {
        let res = sqlx::query("UPDATE study_activities SET name = ?2, url = ?3 WHERE id = ?1")
            .bind(id_i64("study activity id", activity.id().value())?)
            .bind(activity.name())
            .bind(activity.url())
            .execute(&self.pool)
            .await
            .map_err(db)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_study_activity(&self, id: StudyActivityId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM study_activities WHERE id = ?1")
            .bind(id_i64("study activity id", id.value())?)
            .execute(&self.pool)
            .await
            .map_err(db)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
