//! Shared error types for the services crate.

use thiserror::Error;

use portal_core::model::{
    GroupError, GroupId, StudyActivityError, StudyActivityId, StudySessionId, WordError, WordId,
};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Coarse classification every service error maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller sent something invalid.
    Validation,
    NotFound,
    /// The store failed; details are internal.
    Storage,
    /// A multi-step write could not commit.
    Conflict,
}

fn storage_kind(err: &StorageError) -> ErrorKind {
    match err {
        StorageError::NotFound => ErrorKind::NotFound,
        StorageError::Conflict => ErrorKind::Conflict,
        StorageError::MissingReference { .. } => ErrorKind::Validation,
        _ => ErrorKind::Storage,
    }
}

/// Errors emitted by `WordService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WordServiceError {
    #[error(transparent)]
    Word(#[from] WordError),
    #[error("word {0} not found")]
    NotFound(WordId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl WordServiceError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Word(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Storage(err) => storage_kind(err),
        }
    }
}

/// Errors emitted by `GroupService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GroupServiceError {
    #[error(transparent)]
    Group(#[from] GroupError),
    #[error("group {0} not found")]
    NotFound(GroupId),
    #[error("word {0} not found")]
    WordNotFound(WordId),
    #[error("word {word_id} is not in group {group_id}")]
    NotMember { group_id: GroupId, word_id: WordId },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl GroupServiceError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Group(_) => ErrorKind::Validation,
            Self::NotFound(_) | Self::WordNotFound(_) | Self::NotMember { .. } => {
                ErrorKind::NotFound
            }
            Self::Storage(err) => storage_kind(err),
        }
    }
}

/// Errors emitted by `StudyActivityService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StudyActivityServiceError {
    #[error(transparent)]
    StudyActivity(#[from] StudyActivityError),
    #[error("study activity {0} not found")]
    NotFound(StudyActivityId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl StudyActivityServiceError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StudyActivity(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Storage(err) => storage_kind(err),
        }
    }
}

/// Errors emitted by `StudySessionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StudySessionServiceError {
    #[error("study session {0} not found")]
    NotFound(StudySessionId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl StudySessionServiceError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Storage(err) => storage_kind(err),
        }
    }
}

/// Errors emitted by `DashboardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl DashboardError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Storage(err) => storage_kind(err),
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
