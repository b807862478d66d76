use std::sync::Arc;

use portal_core::Page;
use portal_core::model::{Group, GroupId, GroupName, StudySession, Word, WordId};
use storage::repository::{GroupRepository, StorageError, StudySessionRepository};

use crate::Clock;
use crate::error::GroupServiceError;

/// Orchestrates groups, their memberships and their sessions.
#[derive(Clone)]
pub struct GroupService {
    clock: Clock,
    groups: Arc<dyn GroupRepository>,
    sessions: Arc<dyn StudySessionRepository>,
}

impl GroupService {
    #[must_use]
    pub fn new(
        clock: Clock,
        groups: Arc<dyn GroupRepository>,
        sessions: Arc<dyn StudySessionRepository>,
    ) -> Self {
        Self {
            clock,
            groups,
            sessions,
        }
    }

    /// Create an empty group.
    ///
    /// # Errors
    ///
    /// Returns `GroupServiceError::Group` if the name is blank.
    /// Returns `GroupServiceError::Storage` if persistence fails.
    pub async fn create_group(&self, name: String) -> Result<Group, GroupServiceError> {
        let name = GroupName::new(name)?;
        let group = self.groups.insert_group(&name, self.clock.now()).await?;
        tracing::debug!(group_id = %group.id(), "created group");
        Ok(group)
    }

    /// Fetch a group by ID.
    ///
    /// # Errors
    ///
    /// Returns `GroupServiceError::NotFound` if the group does not exist.
    /// Returns `GroupServiceError::Storage` if repository access fails.
    pub async fn get_group(&self, id: GroupId) -> Result<Group, GroupServiceError> {
        self.groups
            .get_group(id)
            .await?
            .ok_or(GroupServiceError::NotFound(id))
    }

    /// # Errors
    ///
    /// Returns `GroupServiceError::Storage` if repository access fails.
    pub async fn list_groups(&self, page: Page) -> Result<Vec<Group>, GroupServiceError> {
        Ok(self.groups.list_groups(page).await?)
    }

    /// Rename a group, keeping its creation time and word count.
    ///
    /// # Errors
    ///
    /// Returns `GroupServiceError::Group` if the name is blank.
    /// Returns `GroupServiceError::NotFound` if the group does not exist.
    /// Returns `GroupServiceError::Storage` if repository access fails.
    pub async fn rename_group(&self, id: GroupId, name: String) -> Result<Group, GroupServiceError> {
        let name = GroupName::new(name)?;
        let mut group = self.get_group(id).await?;
        group.rename(name, self.clock.now());
        self.groups
            .update_group(&group)
            .await
            .map_err(|err| not_found_as(err, id))?;
        Ok(group)
    }

    /// Delete a group together with its sessions, their reviews and its
    /// memberships. Words themselves are kept.
    ///
    /// # Errors
    ///
    /// Returns `GroupServiceError::NotFound` if the group does not exist.
    /// Returns `GroupServiceError::Storage` if the transaction fails; nothing
    /// is deleted in that case.
    pub async fn delete_group(&self, id: GroupId) -> Result<(), GroupServiceError> {
        self.groups
            .delete_group(id)
            .await
            .map_err(|err| not_found_as(err, id))?;
        tracing::info!(group_id = %id, "group deleted");
        Ok(())
    }

    /// Words of a group ordered by word ID.
    ///
    /// # Errors
    ///
    /// Returns `GroupServiceError::NotFound` if the group does not exist.
    /// Returns `GroupServiceError::Storage` if repository access fails.
    pub async fn list_group_words(
        &self,
        id: GroupId,
        page: Page,
    ) -> Result<Vec<Word>, GroupServiceError> {
        self.get_group(id).await?;
        Ok(self.groups.list_group_words(id, page).await?)
    }

    /// Sessions of a group ordered by session ID.
    ///
    /// # Errors
    ///
    /// Returns `GroupServiceError::NotFound` if the group does not exist.
    /// Returns `GroupServiceError::Storage` if repository access fails.
    pub async fn list_group_study_sessions(
        &self,
        id: GroupId,
        page: Page,
    ) -> Result<Vec<StudySession>, GroupServiceError> {
        self.get_group(id).await?;
        Ok(self.sessions.list_group_study_sessions(id, page).await?)
    }

    /// Add a word to a group; adding an existing member changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `GroupServiceError::NotFound` or `GroupServiceError::WordNotFound`
    /// when either side is missing.
    /// Returns `GroupServiceError::Storage` if repository access fails.
    pub async fn add_word(
        &self,
        group_id: GroupId,
        word_id: WordId,
    ) -> Result<Group, GroupServiceError> {
        self.groups
            .add_word_to_group(group_id, word_id, self.clock.now())
            .await
            .map_err(|err| match err {
                StorageError::NotFound => GroupServiceError::NotFound(group_id),
                StorageError::MissingReference { .. } => GroupServiceError::WordNotFound(word_id),
                other => other.into(),
            })
    }

    /// Remove a word from a group.
    ///
    /// # Errors
    ///
    /// Returns `GroupServiceError::NotFound` if the group does not exist and
    /// `GroupServiceError::NotMember` if the word is not in it.
    /// Returns `GroupServiceError::Storage` if repository access fails.
    pub async fn remove_word(
        &self,
        group_id: GroupId,
        word_id: WordId,
    ) -> Result<Group, GroupServiceError> {
        self.get_group(group_id).await?;
        self.groups
            .remove_word_from_group(group_id, word_id, self.clock.now())
            .await
            .map_err(|err| match err {
                StorageError::NotFound => GroupServiceError::NotMember { group_id, word_id },
                other => other.into(),
            })
    }
}

fn not_found_as(err: StorageError, id: GroupId) -> GroupServiceError {
    match err {
        StorageError::NotFound => GroupServiceError::NotFound(id),
        other => other.into(),
    }
}
