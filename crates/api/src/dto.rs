//! REST DTOs with serde derives for HTTP API

use chrono::{DateTime, Utc};
use portal_core::DashboardStats;
use portal_core::model::{
    Group, GroupId, LastStudySession, ReviewItem, StudyActivity, StudyActivityId, StudySession,
    Word, WordId,
};
use portal_core::stats::StudyProgress;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use services::WordDraft;

// ===== Words =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordDto {
    pub id: u64,
    pub malay: String,
    pub jawi: String,
    pub english: String,
    /// Grammatical metadata, always a JSON object
    pub parts: Value,
}

impl From<Word> for WordDto {
    fn from(word: Word) -> Self {
        Self {
            id: word.id().value(),
            malay: word.malay().to_owned(),
            jawi: word.jawi().to_owned(),
            english: word.english().to_owned(),
            parts: word.parts().clone().into_value(),
        }
    }
}

/// Create and replace payload for a word
#[derive(Debug, Clone, Deserialize)]
pub struct WordRequest {
    pub malay: String,
    pub jawi: String,
    pub english: String,
    pub parts: Value,
}

impl From<WordRequest> for WordDraft {
    fn from(req: WordRequest) -> Self {
        Self {
            malay: req.malay,
            jawi: req.jawi,
            english: req.english,
            parts: req.parts,
        }
    }
}

// ===== Groups =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDto {
    pub id: u64,
    pub name: String,
    pub words_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Group> for GroupDto {
    fn from(group: Group) -> Self {
        Self {
            id: group.id().value(),
            name: group.name().to_string(),
            words_count: group.words_count(),
            created_at: group.created_at(),
            updated_at: group.updated_at(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupRequest {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupWordRequest {
    pub word_id: WordId,
}

// ===== Study activities =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyActivityDto {
    pub id: u64,
    pub name: String,
    pub url: String,
}

impl From<StudyActivity> for StudyActivityDto {
    fn from(activity: StudyActivity) -> Self {
        Self {
            id: activity.id().value(),
            name: activity.name().to_owned(),
            url: activity.url().to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StudyActivityRequest {
    pub name: String,
    pub url: String,
}

// ===== Study sessions and reviews =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySessionDto {
    pub id: u64,
    pub group_id: u64,
    pub study_activity_id: u64,
    pub created_at: DateTime<Utc>,
}

impl From<StudySession> for StudySessionDto {
    fn from(session: StudySession) -> Self {
        Self {
            id: session.id().value(),
            group_id: session.group_id().value(),
            study_activity_id: session.study_activity_id().value(),
            created_at: session.created_at(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudySessionRequest {
    pub group_id: GroupId,
    pub study_activity_id: StudyActivityId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewItemDto {
    pub id: u64,
    pub word_id: u64,
    pub study_session_id: u64,
    pub correct: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewItem> for ReviewItemDto {
    fn from(review: ReviewItem) -> Self {
        Self {
            id: review.id().value(),
            word_id: review.word_id().value(),
            study_session_id: review.study_session_id().value(),
            correct: review.correct(),
            created_at: review.created_at(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReviewRequest {
    pub word_id: WordId,
    pub correct: bool,
}

// ===== Dashboard =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStatsDto {
    pub success_rate: f64,
    pub total_study_sessions: u64,
    pub total_active_groups: u64,
    pub study_streak_days: u32,
}

impl From<DashboardStats> for DashboardStatsDto {
    fn from(stats: DashboardStats) -> Self {
        Self {
            success_rate: stats.success_rate,
            total_study_sessions: stats.total_study_sessions,
            total_active_groups: stats.total_active_groups,
            study_streak_days: stats.study_streak_days,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastStudySessionDto {
    pub id: u64,
    pub group_id: u64,
    pub group_name: String,
    pub study_activity_id: u64,
    pub created_at: DateTime<Utc>,
}

impl From<LastStudySession> for LastStudySessionDto {
    fn from(last: LastStudySession) -> Self {
        Self {
            id: last.session.id().value(),
            group_id: last.session.group_id().value(),
            group_name: last.group_name,
            study_activity_id: last.session.study_activity_id().value(),
            created_at: last.session.created_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyProgressDto {
    pub total_words_studied: u64,
    pub total_available_words: u64,
}

impl From<StudyProgress> for StudyProgressDto {
    fn from(progress: StudyProgress) -> Self {
        Self {
            total_words_studied: progress.total_words_studied,
            total_available_words: progress.total_available_words,
        }
    }
}

// ===== Misc =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDto {
    pub message: String,
}

impl MessageDto {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
