use std::sync::Arc;

use portal_core::Page;
use portal_core::model::{Word, WordFields, WordId, WordParts};
use serde_json::Value;
use storage::repository::{StorageError, WordRepository};

use crate::error::WordServiceError;

/// Raw word input as received from a caller, validated by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct WordDraft {
    pub malay: String,
    pub jawi: String,
    pub english: String,
    /// Must be a JSON object; `null` is rejected.
    pub parts: Value,
}

impl WordDraft {
    fn validate(self) -> Result<WordFields, WordServiceError> {
        let parts = WordParts::from_value(self.parts)?;
        Ok(WordFields::new(self.malay, self.jawi, self.english, parts)?)
    }
}

/// Vocabulary CRUD.
#[derive(Clone)]
pub struct WordService {
    words: Arc<dyn WordRepository>,
}

impl WordService {
    #[must_use]
    pub fn new(words: Arc<dyn WordRepository>) -> Self {
        Self { words }
    }

    /// Validate and persist a new word.
    ///
    /// # Errors
    ///
    /// Returns `WordServiceError::Word` for blank text or non-object parts.
    /// Returns `WordServiceError::Storage` if persistence fails.
    pub async fn create_word(&self, draft: WordDraft) -> Result<Word, WordServiceError> {
        let fields = draft.validate()?;
        let word = self.words.insert_word(&fields).await?;
        tracing::debug!(word_id = %word.id(), "created word");
        Ok(word)
    }

    /// Fetch a word by ID.
    ///
    /// # Errors
    ///
    /// Returns `WordServiceError::NotFound` if the word does not exist.
    /// Returns `WordServiceError::Storage` if repository access fails.
    pub async fn get_word(&self, id: WordId) -> Result<Word, WordServiceError> {
        self.words
            .get_word(id)
            .await?
            .ok_or(WordServiceError::NotFound(id))
    }

    /// List words ordered by ID, optionally filtered by a search term.
    ///
    /// Blank search terms are ignored.
    ///
    /// # Errors
    ///
    /// Returns `WordServiceError::Storage` if repository access fails.
    pub async fn list_words(
        &self,
        search: Option<&str>,
        page: Page,
    ) -> Result<Vec<Word>, WordServiceError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        Ok(self.words.list_words(search, page).await?)
    }

    /// Replace every field of an existing word.
    ///
    /// # Errors
    ///
    /// Returns `WordServiceError::Word` if validation fails.
    /// Returns `WordServiceError::NotFound` if the word does not exist.
    /// Returns `WordServiceError::Storage` if repository access fails.
    pub async fn update_word(&self, id: WordId, draft: WordDraft) -> Result<Word, WordServiceError> {
        let fields = draft.validate()?;
        let mut word = self.get_word(id).await?;
        word.replace_fields(fields);
        self.words.update_word(&word).await.map_err(|err| match err {
            StorageError::NotFound => WordServiceError::NotFound(id),
            other => other.into(),
        })?;
        Ok(word)
    }

    /// Delete a word along with its reviews and group memberships.
    ///
    /// # Errors
    ///
    /// Returns `WordServiceError::NotFound` if the word does not exist.
    /// Returns `WordServiceError::Storage` if the delete cannot complete.
    pub async fn delete_word(&self, id: WordId) -> Result<(), WordServiceError> {
        self.words.delete_word(id).await.map_err(|err| match err {
            StorageError::NotFound => WordServiceError::NotFound(id),
            other => other.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use storage::repository::InMemoryRepository;

    use crate::error::ErrorKind;

    fn draft(malay: &str, english: &str) -> WordDraft {
        WordDraft {
            malay: malay.into(),
            jawi: "جاوي".into(),
            english: english.into(),
            parts: json!({ "type": "noun" }),
        }
    }

    fn service() -> WordService {
        WordService::new(Arc::new(InMemoryRepository::new()))
    }

    #[tokio::test]
    async fn create_then_get_returns_input_fields() {
        let service = service();
        let created = service.create_word(draft("kucing", "cat")).await.unwrap();

        let fetched = service.get_word(created.id()).await.unwrap();
        assert_eq!(fetched.malay(), "kucing");
        assert_eq!(fetched.english(), "cat");
        assert_eq!(fetched.parts().get("type"), Some(&json!("noun")));
    }

    #[tokio::test]
    async fn update_replaces_every_field() {
        let service = service();
        let created = service.create_word(draft("kucing", "cat")).await.unwrap();

        let replacement = WordDraft {
            parts: json!({}),
            ..draft("anjing", "dog")
        };
        service.update_word(created.id(), replacement).await.unwrap();

        let fetched = service.get_word(created.id()).await.unwrap();
        assert_eq!(fetched.malay(), "anjing");
        assert_eq!(fetched.english(), "dog");
        assert!(fetched.parts().as_map().is_empty());
    }

    #[tokio::test]
    async fn invalid_input_is_a_validation_error() {
        let service = service();
        let err = service.create_word(draft("  ", "cat")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        for parts in [json!(["noun"]), Value::Null] {
            let err = service
                .create_word(WordDraft {
                    parts,
                    ..draft("kucing", "cat")
                })
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[tokio::test]
    async fn missing_words_are_not_found() {
        let service = service();
        let missing = WordId::new(77);
        assert!(matches!(
            service.get_word(missing).await,
            Err(WordServiceError::NotFound(id)) if id == missing
        ));
        assert!(matches!(
            service.update_word(missing, draft("a", "b")).await,
            Err(WordServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_word(missing).await,
            Err(WordServiceError::NotFound(_))
        ));
    }
}
