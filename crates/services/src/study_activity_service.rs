use std::sync::Arc;

use portal_core::Page;
use portal_core::model::{StudyActivity, StudyActivityFields, StudyActivityId, StudySession};
use storage::repository::{StorageError, StudyActivityRepository, StudySessionRepository};

use crate::error::StudyActivityServiceError;

/// Study activity catalog and the sessions run through each activity.
#[derive(Clone)]
pub struct StudyActivityService {
    activities: Arc<dyn StudyActivityRepository>,
    sessions: Arc<dyn StudySessionRepository>,
}

impl StudyActivityService {
    #[must_use]
    pub fn new(
        activities: Arc<dyn StudyActivityRepository>,
        sessions: Arc<dyn StudySessionRepository>,
    ) -> Self {
        Self {
            activities,
            sessions,
        }
    }

    /// # Errors
    ///
    /// Returns `StudyActivityServiceError::StudyActivity` if the name or URL is blank.
    /// Returns `StudyActivityServiceError::Storage` if persistence fails.
    pub async fn create_activity(
        &self,
        name: String,
        url: String,
    ) -> Result<StudyActivity, StudyActivityServiceError> {
        let fields = StudyActivityFields::new(name, url)?;
        Ok(self.activities.insert_study_activity(&fields).await?)
    }

    /// # Errors
    ///
    /// Returns `StudyActivityServiceError::NotFound` if the activity does not exist.
    /// Returns `StudyActivityServiceError::Storage` if repository access fails.
    pub async fn get_activity(
        &self,
        id: StudyActivityId,
    ) -> Result<StudyActivity, StudyActivityServiceError> {
        self.activities
            .get_study_activity(id)
            .await?
            .ok_or(StudyActivityServiceError::NotFound(id))
    }

    /// # Errors
    ///
    /// Returns `StudyActivityServiceError::Storage` if repository access fails.
    pub async fn list_activities(
        &self,
        page: Page,
    ) -> Result<Vec<StudyActivity>, StudyActivityServiceError> {
        Ok(self.activities.list_study_activities(page).await?)
    }

    /// Replace name and URL of an activity.
    ///
    /// # Errors
    ///
    /// Returns `StudyActivityServiceError::StudyActivity` if validation fails.
    /// Returns `StudyActivityServiceError::NotFound` if the activity does not exist.
    /// Returns `StudyActivityServiceError::Storage` if repository access fails.
    pub async fn update_activity(
        &self,
        id: StudyActivityId,
        name: String,
        url: String,
    ) -> Result<StudyActivity, StudyActivityServiceError> {
        let fields = StudyActivityFields::new(name, url)?;
        let mut activity = self.get_activity(id).await?;
        activity.replace_fields(fields);
        self.activities
            .update_study_activity(&activity)
            .await
            .map_err(|err| not_found_as(err, id))?;
        Ok(activity)
    }

    /// Delete an activity; sessions run through it are removed as well.
    ///
    /// # Errors
    ///
    /// Returns `StudyActivityServiceError::NotFound` if the activity does not exist.
    /// Returns `StudyActivityServiceError::Storage` if repository access fails.
    pub async fn delete_activity(&self, id: StudyActivityId) -> Result<(), StudyActivityServiceError> {
        self.activities
            .delete_study_activity(id)
            .await
            .map_err(|err| not_found_as(err, id))
    }

    /// Sessions run through an activity, ordered by session ID.
    ///
    /// # Errors
    ///
    /// Returns `StudyActivityServiceError::NotFound` if the activity does not exist.
    /// Returns `StudyActivityServiceError::Storage` if repository access fails.
    pub async fn list_activity_study_sessions(
        &self,
        id: StudyActivityId,
        page: Page,
    ) -> Result<Vec<StudySession>, StudyActivityServiceError> {
        self.get_activity(id).await?;
        Ok(self.sessions.list_activity_study_sessions(id, page).await?)
    }
}

fn not_found_as(err: StorageError, id: StudyActivityId) -> StudyActivityServiceError {
    match err {
        StorageError::NotFound => StudyActivityServiceError::NotFound(id),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn update_replaces_name_and_url() {
        let repo = InMemoryRepository::new();
        let service = StudyActivityService::new(Arc::new(repo.clone()), Arc::new(repo));
        let created = service
            .create_activity("Flashcards".into(), "http://localhost:8081".into())
            .await
            .unwrap();

        service
            .update_activity(created.id(), "Typing".into(), "http://localhost:9000".into())
            .await
            .unwrap();

        let fetched = service.get_activity(created.id()).await.unwrap();
        assert_eq!(fetched.name(), "Typing");
        assert_eq!(fetched.url(), "http://localhost:9000");
    }

    #[tokio::test]
    async fn sessions_of_a_missing_activity_are_not_found() {
        let repo = InMemoryRepository::new();
        let service = StudyActivityService::new(Arc::new(repo.clone()), Arc::new(repo));
        let err = service
            .list_activity_study_sessions(StudyActivityId::new(5), Page::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StudyActivityServiceError::NotFound(_)));
    }
}
