use thiserror::Error;

use crate::model::ids::StudyActivityId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StudyActivityError {
    #[error("study activity name cannot be empty")]
    EmptyName,

    #[error("study activity url cannot be empty")]
    EmptyUrl,
}

/// Validated, mutable fields of a study activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyActivityFields {
    name: String,
    url: String,
}

impl StudyActivityFields {
    /// # Errors
    ///
    /// Returns `StudyActivityError` if the name or url is blank.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Result<Self, StudyActivityError> {
        let name = name.into();
        let url = url.into();
        if name.trim().is_empty() {
            return Err(StudyActivityError::EmptyName);
        }
        if url.trim().is_empty() {
            return Err(StudyActivityError::EmptyUrl);
        }
        Ok(Self { name, url })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// A named exercise type (e.g. flashcards) launched from `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyActivity {
    id: StudyActivityId,
    fields: StudyActivityFields,
}

impl StudyActivity {
    #[must_use]
    pub fn new(id: StudyActivityId, fields: StudyActivityFields) -> Self {
        Self { id, fields }
    }

    #[must_use]
    pub fn id(&self) -> StudyActivityId {
        self.id
    }

    #[must_use]
    pub fn fields(&self) -> &StudyActivityFields {
        &self.fields
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.fields.name()
    }

    #[must_use]
    pub fn url(&self) -> &str {
        self.fields.url()
    }

    pub fn replace_fields(&mut self, fields: StudyActivityFields) {
        self.fields = fields;
    }
}
