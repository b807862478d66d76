use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::GroupId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GroupError {
    #[error("group name cannot be empty")]
    EmptyName,
}

/// Validated group name (non-blank, stored as given).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupName(String);

impl GroupName {
    /// Create a validated group name.
    ///
    /// # Errors
    ///
    /// Returns `GroupError::EmptyName` if the name is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, GroupError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(GroupError::EmptyName);
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GroupName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named collection of words.
///
/// `words_count` is a cached count of memberships, maintained by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    id: GroupId,
    name: GroupName,
    words_count: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Group {
    #[must_use]
    pub fn new(
        id: GroupId,
        name: GroupName,
        words_count: u32,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            words_count,
            created_at,
            updated_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> GroupId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &GroupName {
        &self.name
    }

    #[must_use]
    pub fn words_count(&self) -> u32 {
        self.words_count
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Rename the group, stamping `updated_at`.
    pub fn rename(&mut self, name: GroupName, at: DateTime<Utc>) {
        self.name = name;
        self.updated_at = at;
    }

    /// Stamp `updated_at` without other changes.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    pub fn set_words_count(&mut self, words_count: u32) {
        self.words_count = words_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn blank_names_are_rejected() {
        assert_eq!(GroupName::new("").unwrap_err(), GroupError::EmptyName);
        assert_eq!(GroupName::new("   ").unwrap_err(), GroupError::EmptyName);
        assert_eq!(GroupName::new("Basic Greetings").unwrap().as_str(), "Basic Greetings");
    }

    #[test]
    fn rename_keeps_creation_time() {
        let created = fixed_now();
        let later = created + chrono::Duration::hours(3);
        let mut group = Group::new(
            GroupId::new(1),
            GroupName::new("Animals").unwrap(),
            4,
            created,
            created,
        );

        group.rename(GroupName::new("Haiwan").unwrap(), later);

        assert_eq!(group.name().as_str(), "Haiwan");
        assert_eq!(group.created_at(), created);
        assert_eq!(group.updated_at(), later);
        assert_eq!(group.words_count(), 4);
    }
}
