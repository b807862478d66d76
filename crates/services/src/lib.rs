#![forbid(unsafe_code)]

pub mod app_services;
pub mod dashboard_service;
pub mod error;
pub mod group_service;
pub mod study_activity_service;
pub mod study_session_service;
pub mod word_service;

pub use portal_core::Clock;
pub use storage::repository::StorageError;

pub use app_services::AppServices;
pub use dashboard_service::DashboardService;
pub use error::{
    AppServicesError, DashboardError, ErrorKind, GroupServiceError, StudyActivityServiceError,
    StudySessionServiceError, WordServiceError,
};
pub use group_service::GroupService;
pub use study_activity_service::StudyActivityService;
pub use study_session_service::StudySessionService;
pub use word_service::{WordDraft, WordService};
