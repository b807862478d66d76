use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::dashboard_service::DashboardService;
use crate::error::AppServicesError;
use crate::group_service::GroupService;
use crate::study_activity_service::StudyActivityService;
use crate::study_session_service::StudySessionService;
use crate::word_service::WordService;

/// Assembles the services exposed by the portal over one storage handle.
#[derive(Clone)]
pub struct AppServices {
    words: Arc<WordService>,
    groups: Arc<GroupService>,
    study_activities: Arc<StudyActivityService>,
    study_sessions: Arc<StudySessionService>,
    dashboard: Arc<DashboardService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage, running migrations first.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    /// Build services over a fresh in-memory store.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(), clock)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        Self {
            words: Arc::new(WordService::new(Arc::clone(&storage.words))),
            groups: Arc::new(GroupService::new(
                clock,
                Arc::clone(&storage.groups),
                Arc::clone(&storage.study_sessions),
            )),
            study_activities: Arc::new(StudyActivityService::new(
                Arc::clone(&storage.study_activities),
                Arc::clone(&storage.study_sessions),
            )),
            study_sessions: Arc::new(StudySessionService::new(
                clock,
                Arc::clone(&storage.study_sessions),
                Arc::clone(&storage.review_items),
            )),
            dashboard: Arc::new(DashboardService::new(Arc::clone(&storage.stats))),
        }
    }

    #[must_use]
    pub fn words(&self) -> Arc<WordService> {
        Arc::clone(&self.words)
    }

    #[must_use]
    pub fn groups(&self) -> Arc<GroupService> {
        Arc::clone(&self.groups)
    }

    #[must_use]
    pub fn study_activities(&self) -> Arc<StudyActivityService> {
        Arc::clone(&self.study_activities)
    }

    #[must_use]
    pub fn study_sessions(&self) -> Arc<StudySessionService> {
        Arc::clone(&self.study_sessions)
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }
}
