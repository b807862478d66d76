use std::sync::Arc;

use portal_core::Page;
use portal_core::model::{
    GroupId, ReviewItem, StudyActivityId, StudySession, StudySessionId, WordId,
};
use storage::repository::{
    NewReviewItemRecord, NewStudySessionRecord, ReviewItemRepository, StudySessionRepository,
};

use crate::Clock;
use crate::error::StudySessionServiceError;

/// Records study sessions and the word reviews made during them.
#[derive(Clone)]
pub struct StudySessionService {
    clock: Clock,
    sessions: Arc<dyn StudySessionRepository>,
    reviews: Arc<dyn ReviewItemRepository>,
}

impl StudySessionService {
    #[must_use]
    pub fn new(
        clock: Clock,
        sessions: Arc<dyn StudySessionRepository>,
        reviews: Arc<dyn ReviewItemRepository>,
    ) -> Self {
        Self {
            clock,
            sessions,
            reviews,
        }
    }

    /// Start a session of `group_id` through `study_activity_id`.
    ///
    /// # Errors
    ///
    /// Returns `StudySessionServiceError::Storage` with
    /// `StorageError::MissingReference` if either reference is unknown; no
    /// session is created in that case.
    pub async fn create_session(
        &self,
        group_id: GroupId,
        study_activity_id: StudyActivityId,
    ) -> Result<StudySession, StudySessionServiceError> {
        let session = self
            .sessions
            .insert_study_session(NewStudySessionRecord {
                group_id,
                study_activity_id,
                created_at: self.clock.now(),
            })
            .await?;
        tracing::debug!(
            session_id = %session.id(),
            group_id = %group_id,
            study_activity_id = %study_activity_id,
            "study session created"
        );
        Ok(session)
    }

    /// # Errors
    ///
    /// Returns `StudySessionServiceError::NotFound` if the session does not exist.
    /// Returns `StudySessionServiceError::Storage` if repository access fails.
    pub async fn get_session(
        &self,
        id: StudySessionId,
    ) -> Result<StudySession, StudySessionServiceError> {
        self.sessions
            .get_study_session(id)
            .await?
            .ok_or(StudySessionServiceError::NotFound(id))
    }

    /// # Errors
    ///
    /// Returns `StudySessionServiceError::Storage` if repository access fails.
    pub async fn list_sessions(
        &self,
        page: Page,
    ) -> Result<Vec<StudySession>, StudySessionServiceError> {
        Ok(self.sessions.list_study_sessions(page).await?)
    }

    /// Record whether `word_id` was answered correctly in a session.
    ///
    /// # Errors
    ///
    /// Returns `StudySessionServiceError::Storage` with
    /// `StorageError::MissingReference` if the session or word is unknown.
    pub async fn record_review(
        &self,
        study_session_id: StudySessionId,
        word_id: WordId,
        correct: bool,
    ) -> Result<ReviewItem, StudySessionServiceError> {
        let review = self
            .reviews
            .insert_review_item(NewReviewItemRecord {
                word_id,
                study_session_id,
                correct,
                created_at: self.clock.now(),
            })
            .await?;
        tracing::debug!(
            review_id = %review.id(),
            session_id = %study_session_id,
            correct,
            "review recorded"
        );
        Ok(review)
    }

    /// Reviews of a session ordered by review ID.
    ///
    /// # Errors
    ///
    /// Returns `StudySessionServiceError::NotFound` if the session does not exist.
    /// Returns `StudySessionServiceError::Storage` if repository access fails.
    pub async fn list_reviews(
        &self,
        study_session_id: StudySessionId,
        page: Page,
    ) -> Result<Vec<ReviewItem>, StudySessionServiceError> {
        self.get_session(study_session_id).await?;
        Ok(self
            .reviews
            .list_session_review_items(study_session_id, page)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use portal_core::model::{GroupName, StudyActivityFields};
    use portal_core::time::fixed_now;
    use storage::repository::{
        GroupRepository, InMemoryRepository, StorageError, StudyActivityRepository,
    };

    use crate::error::ErrorKind;

    fn service(repo: &InMemoryRepository) -> StudySessionService {
        StudySessionService::new(
            Clock::fixed(fixed_now()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
        )
    }

    #[tokio::test]
    async fn unknown_references_create_nothing() {
        let repo = InMemoryRepository::new();
        let service = service(&repo);
        let activity = repo
            .insert_study_activity(&StudyActivityFields::new("Quiz", "http://quiz").unwrap())
            .await
            .unwrap();

        let err = service
            .create_session(GroupId::new(12), activity.id())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(matches!(
            err,
            StudySessionServiceError::Storage(StorageError::MissingReference { entity: "group", .. })
        ));
        assert!(service.list_sessions(Page::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reviews_are_listed_per_session() {
        let repo = InMemoryRepository::new();
        let service = service(&repo);
        let group = repo
            .insert_group(&GroupName::new("Basics").unwrap(), fixed_now())
            .await
            .unwrap();
        let activity = repo
            .insert_study_activity(&StudyActivityFields::new("Quiz", "http://quiz").unwrap())
            .await
            .unwrap();
        let session = service.create_session(group.id(), activity.id()).await.unwrap();
        assert_eq!(session.created_at(), fixed_now());

        let err = service
            .record_review(session.id(), WordId::new(3), true)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = service
            .list_reviews(StudySessionId::new(999), Page::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StudySessionServiceError::NotFound(_)));
        assert!(
            service
                .list_reviews(session.id(), Page::default())
                .await
                .unwrap()
                .is_empty()
        );
    }
}
