use portal_core::Page;
use portal_core::model::{GroupId, StudyActivityId, StudySession, StudySessionId};

use super::SqliteRepository;
use super::mapping::{commit_failed, db, id_i64, map_rows, map_study_session_row, page_bounds};
use crate::repository::{NewStudySessionRecord, StorageError, StudySessionRepository};

#[async_trait::async_trait]
impl StudySessionRepository for SqliteRepository {
    async fn insert_study_session(
        &self,
        session: NewStudySessionRecord,
    ) -> Result<StudySession, StorageError> {
        let group_id = id_i64("group id", session.group_id.value())?;
        let activity_id = id_i64("study activity id", session.study_activity_id.value())?;
        let mut tx = self.pool.begin().await.map_err(db)?;

        let group = sqlx::query("SELECT 1 FROM groups WHERE id = ?1")
            .bind(group_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db)?;
        if group.is_none() {
            return Err(StorageError::MissingReference {
                entity: "group",
                id: session.group_id.value(),
            });
        }

        let activity = sqlx::query("SELECT 1 FROM study_activities WHERE id = ?1")
            .bind(activity_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db)?;
        if activity.is_none() {
            return Err(StorageError::MissingReference {
                entity: "study activity",
                id: session.study_activity_id.value(),
            });
        }

        let res = sqlx::query(
            r"
            INSERT INTO study_sessions (group_id, study_activity_id, created_at)
            VALUES (?1, ?2, ?3)
            ",
        )
        .bind(group_id)
        .bind(activity_id)
        .bind(session.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db)?;

        tx.commit().await.map_err(commit_failed)?;

        let id = u64::try_from(res.last_insert_rowid())
            .map_err(|_| StorageError::Serialization("study session id sign overflow".into()))?;
        Ok(StudySession::new(
            StudySessionId::new(id),
            session.group_id,
            session.study_activity_id,
            session.created_at,
        ))
    }

    async fn get_study_session(
        &self,
        id: StudySessionId,
    ) -> Result<Option<StudySession>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, group_id, study_activity_id, created_at
            FROM study_sessions
            WHERE id = ?1
            ",
        )
        .bind(id_i64("study session id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(db)?;

        row.as_ref().map(map_study_session_row).transpose()
    }

    async fn list_study_sessions(&self, page: Page) -> Result<Vec<StudySession>, StorageError> {
        let (limit, offset) = page_bounds(page);
        let rows = sqlx::query(
            r"
            SELECT id, group_id, study_activity_id, created_at
            FROM study_sessions
            ORDER BY id ASC
            LIMIT ?1 OFFSET ?2
            ",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;

        map_rows(&rows, map_study_session_row)
    }

    async fn list_group_study_sessions(
        &self,
        group_id: GroupId,
        page: Page,
    ) -> Result<Vec<StudySession>, StorageError> {
        let (limit, offset) = page_bounds(page);
        let rows = sqlx::query(
            r"
            SELECT id, group_id, study_activity_id, created_at
            FROM study_sessions
            WHERE group_id = ?1
            ORDER BY id ASC
            LIMIT ?2 OFFSET ?3
            ",
        )
        .bind(id_i64("group id", group_id.value())?)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;

        map_rows(&rows, map_study_session_row)
    }

    async fn list_activity_study_sessions(
        &self,
        study_activity_id: StudyActivityId,
        page: Page,
    ) -> Result<Vec<StudySession>, StorageError> {
        let (limit, offset) = page_bounds(page);
        let rows = sqlx::query(
            r"
            SELECT id, group_id, study_activity_id, created_at
            FROM study_sessions
            WHERE study_activity_id = ?1
            ORDER BY id ASC
            LIMIT ?2 OFFSET ?3
            ",
        )
        .bind(id_i64("study activity id", study_activity_id.value())?)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;

        map_rows(&rows, map_study_session_row)
    }
}
