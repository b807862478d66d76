use async_trait::async_trait;
use chrono::{DateTime, Utc};
use portal_core::model::{
    Group, GroupId, GroupName, LastStudySession, ReviewItem, StudyActivity, StudyActivityFields,
    StudyActivityId, StudySession, StudySessionId, Word, WordFields, WordId,
};
use portal_core::stats::StudyProgress;
use portal_core::{Page, StudyHistory};
use std::sync::Arc;
use thiserror::Error;

pub use crate::memory::InMemoryRepository;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("referenced {entity} {id} does not exist")]
    MissingReference { entity: &'static str, id: u64 },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Insert shape for a study session; the store assigns the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewStudySessionRecord {
    pub group_id: GroupId,
    pub study_activity_id: StudyActivityId,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for a review item; the store assigns the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewReviewItemRecord {
    pub word_id: WordId,
    pub study_session_id: StudySessionId,
    pub correct: bool,
    pub created_at: DateTime<Utc>,
}

/// Repository contract for vocabulary words.
#[async_trait]
pub trait WordRepository: Send + Sync {
    /// Persist a new word and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the word cannot be stored.
    async fn insert_word(&self, fields: &WordFields) -> Result<Word, StorageError>;

    /// Fetch a word by ID, `None` when missing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_word(&self, id: WordId) -> Result<Option<Word>, StorageError>;

    /// List words ordered by id, optionally filtered by a case-insensitive
    /// substring over malay, jawi and english.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_words(&self, search: Option<&str>, page: Page)
    -> Result<Vec<Word>, StorageError>;

    /// Replace every mutable field of an existing word.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the word does not exist.
    async fn update_word(&self, word: &Word) -> Result<(), StorageError>;

    /// Delete a word with its review items and group memberships, adjusting
    /// the cached `words_count` of affected groups, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the word does not exist, and
    /// `StorageError::Conflict` if the transaction cannot commit.
    async fn delete_word(&self, id: WordId) -> Result<(), StorageError>;
}

/// Repository contract for groups and their word memberships.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the group cannot be stored.
    async fn insert_group(
        &self,
        name: &GroupName,
        created_at: DateTime<Utc>,
    ) -> Result<Group, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_group(&self, id: GroupId) -> Result<Option<Group>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_groups(&self, page: Page) -> Result<Vec<Group>, StorageError>;

    /// Persist the name and `updated_at` of an existing group.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the group does not exist.
    async fn update_group(&self, group: &Group) -> Result<(), StorageError>;

    /// Delete a group and everything that exists only because of it.
    ///
    /// Existence is re-checked inside the transaction; the sessions of the
    /// group, their review items and the memberships go with it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the group does not exist, and
    /// `StorageError::Conflict` if the transaction cannot commit.
    async fn delete_group(&self, id: GroupId) -> Result<(), StorageError>;

    /// List the words of a group ordered by word id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_group_words(&self, id: GroupId, page: Page) -> Result<Vec<Word>, StorageError>;

    /// Add a word to a group. Adding an existing member changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the group is missing and
    /// `StorageError::MissingReference` if the word is missing.
    async fn add_word_to_group(
        &self,
        group_id: GroupId,
        word_id: WordId,
        at: DateTime<Utc>,
    ) -> Result<Group, StorageError>;

    /// Remove a word from a group.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the group is missing or the word is
    /// not a member.
    async fn remove_word_from_group(
        &self,
        group_id: GroupId,
        word_id: WordId,
        at: DateTime<Utc>,
    ) -> Result<Group, StorageError>;
}

/// Repository contract for study activities.
#[async_trait]
pub trait StudyActivityRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the activity cannot be stored.
    async fn insert_study_activity(
        &self,
        fields: &StudyActivityFields,
    ) -> Result<StudyActivity, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_study_activity(
        &self,
        id: StudyActivityId,
    ) -> Result<Option<StudyActivity>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_study_activities(&self, page: Page) -> Result<Vec<StudyActivity>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the activity does not exist.
    async fn update_study_activity(&self, activity: &StudyActivity) -> Result<(), StorageError>;

    /// Remove an activity row; its sessions cascade.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the activity does not exist.
    async fn delete_study_activity(&self, id: StudyActivityId) -> Result<(), StorageError>;
}

/// Repository contract for study sessions.
#[async_trait]
pub trait StudySessionRepository: Send + Sync {
    /// Insert a session after verifying both references in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::MissingReference` if the group or activity is missing.
    async fn insert_study_session(
        &self,
        session: NewStudySessionRecord,
    ) -> Result<StudySession, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_study_session(
        &self,
        id: StudySessionId,
    ) -> Result<Option<StudySession>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_study_sessions(&self, page: Page) -> Result<Vec<StudySession>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_group_study_sessions(
        &self,
        group_id: GroupId,
        page: Page,
    ) -> Result<Vec<StudySession>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_activity_study_sessions(
        &self,
        study_activity_id: StudyActivityId,
        page: Page,
    ) -> Result<Vec<StudySession>, StorageError>;
}

/// Repository contract for append-only review items.
#[async_trait]
pub trait ReviewItemRepository: Send + Sync {
    /// Insert a review after verifying the word and session in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::MissingReference` if the word or session is missing.
    async fn insert_review_item(
        &self,
        review: NewReviewItemRecord,
    ) -> Result<ReviewItem, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_session_review_items(
        &self,
        study_session_id: StudySessionId,
        page: Page,
    ) -> Result<Vec<ReviewItem>, StorageError>;
}

/// Read-only aggregate queries backing the dashboard.
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Counts and session days, read as one snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any read fails; no partial history is returned.
    async fn study_history(&self) -> Result<StudyHistory, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn study_progress(&self) -> Result<StudyProgress, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn last_study_session(&self) -> Result<Option<LastStudySession>, StorageError>;
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub words: Arc<dyn WordRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub study_activities: Arc<dyn StudyActivityRepository>,
    pub study_sessions: Arc<dyn StudySessionRepository>,
    pub review_items: Arc<dyn ReviewItemRepository>,
    pub stats: Arc<dyn StatsRepository>,
}

impl Storage {
    /// Wire every repository to the same backend value.
    pub fn from_backend<R>(repo: R) -> Self
    where
        R: WordRepository
            + GroupRepository
            + StudyActivityRepository
            + StudySessionRepository
            + ReviewItemRepository
            + StatsRepository
            + Clone
            + 'static,
    {
        Self {
            words: Arc::new(repo.clone()),
            groups: Arc::new(repo.clone()),
            study_activities: Arc::new(repo.clone()),
            study_sessions: Arc::new(repo.clone()),
            review_items: Arc::new(repo.clone()),
            stats: Arc::new(repo),
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_backend(InMemoryRepository::new())
    }
}
