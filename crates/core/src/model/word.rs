use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::ids::WordId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WordError {
    #[error("malay text cannot be empty")]
    EmptyMalay,

    #[error("jawi text cannot be empty")]
    EmptyJawi,

    #[error("english text cannot be empty")]
    EmptyEnglish,

    #[error("word parts must be a JSON object")]
    PartsNotObject,

    #[error("invalid persisted word parts: {0}")]
    InvalidPersistedParts(String),
}

//
// ─── PARTS ─────────────────────────────────────────────────────────────────────
//

/// Grammatical metadata attached to a word, e.g. `{"type": "noun"}`.
///
/// Always a JSON object; an empty object is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WordParts(Map<String, Value>);

impl WordParts {
    #[must_use]
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Accepts an arbitrary JSON value as parts.
    ///
    /// # Errors
    ///
    /// Returns `WordError::PartsNotObject` for anything but a JSON object.
    pub fn from_value(value: Value) -> Result<Self, WordError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(WordError::PartsNotObject),
        }
    }

    /// Parses parts from their stored JSON text.
    ///
    /// # Errors
    ///
    /// Returns `WordError::InvalidPersistedParts` if the text is not a JSON object.
    pub fn from_json_str(raw: &str) -> Result<Self, WordError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| WordError::InvalidPersistedParts(e.to_string()))?;
        Self::from_value(value)
            .map_err(|_| WordError::InvalidPersistedParts("not an object".into()))
    }

    /// Serializes parts to compact JSON text.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

//
// ─── FIELDS ────────────────────────────────────────────────────────────────────
//

/// Validated, mutable fields of a word.
///
/// Text is stored exactly as given; blank values are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordFields {
    malay: String,
    jawi: String,
    english: String,
    parts: WordParts,
}

impl WordFields {
    /// Validate the fields of a word.
    ///
    /// # Errors
    ///
    /// Returns the first `WordError` for a blank text field.
    pub fn new(
        malay: impl Into<String>,
        jawi: impl Into<String>,
        english: impl Into<String>,
        parts: WordParts,
    ) -> Result<Self, WordError> {
        let malay = malay.into();
        let jawi = jawi.into();
        let english = english.into();

        if malay.trim().is_empty() {
            return Err(WordError::EmptyMalay);
        }
        if jawi.trim().is_empty() {
            return Err(WordError::EmptyJawi);
        }
        if english.trim().is_empty() {
            return Err(WordError::EmptyEnglish);
        }

        Ok(Self {
            malay,
            jawi,
            english,
            parts,
        })
    }

    #[must_use]
    pub fn malay(&self) -> &str {
        &self.malay
    }

    #[must_use]
    pub fn jawi(&self) -> &str {
        &self.jawi
    }

    #[must_use]
    pub fn english(&self) -> &str {
        &self.english
    }

    #[must_use]
    pub fn parts(&self) -> &WordParts {
        &self.parts
    }

    /// Substring match over the three text fields, case-insensitive for ASCII
    /// letters only. Matches `SQLite`'s `lower()`, which leaves other scripts
    /// untouched.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_ascii_lowercase();
        [&self.malay, &self.jawi, &self.english]
            .iter()
            .any(|text| text.to_ascii_lowercase().contains(&needle))
    }
}

//
// ─── WORD ──────────────────────────────────────────────────────────────────────
//

/// A vocabulary entry: Malay in Latin and Jawi script with its English meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    id: WordId,
    fields: WordFields,
}

impl Word {
    #[must_use]
    pub fn new(id: WordId, fields: WordFields) -> Self {
        Self { id, fields }
    }

    #[must_use]
    pub fn id(&self) -> WordId {
        self.id
    }

    #[must_use]
    pub fn fields(&self) -> &WordFields {
        &self.fields
    }

    #[must_use]
    pub fn malay(&self) -> &str {
        self.fields.malay()
    }

    #[must_use]
    pub fn jawi(&self) -> &str {
        self.fields.jawi()
    }

    #[must_use]
    pub fn english(&self) -> &str {
        self.fields.english()
    }

    #[must_use]
    pub fn parts(&self) -> &WordParts {
        self.fields.parts()
    }

    /// Replace every mutable field.
    pub fn replace_fields(&mut self, fields: WordFields) {
        self.fields = fields;
    }
}
