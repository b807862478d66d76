use chrono::{DateTime, Utc};

use crate::model::ids::{ReviewItemId, StudySessionId, WordId};

/// Outcome of reviewing one word within one study session.
///
/// Review items are append-only: there is no update or delete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    id: ReviewItemId,
    word_id: WordId,
    study_session_id: StudySessionId,
    correct: bool,
    created_at: DateTime<Utc>,
}

impl ReviewItem {
    #[must_use]
    pub fn new(
        id: ReviewItemId,
        word_id: WordId,
        study_session_id: StudySessionId,
        correct: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            word_id,
            study_session_id,
            correct,
            created_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> ReviewItemId {
        self.id
    }

    #[must_use]
    pub fn word_id(&self) -> WordId {
        self.word_id
    }

    #[must_use]
    pub fn study_session_id(&self) -> StudySessionId {
        self.study_session_id
    }

    #[must_use]
    pub fn correct(&self) -> bool {
        self.correct
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
