use chrono::{DateTime, Utc};

use crate::model::ids::{GroupId, StudyActivityId, StudySessionId};

/// One occurrence of a group being studied through an activity.
///
/// Sessions are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudySession {
    id: StudySessionId,
    group_id: GroupId,
    study_activity_id: StudyActivityId,
    created_at: DateTime<Utc>,
}

impl StudySession {
    #[must_use]
    pub fn new(
        id: StudySessionId,
        group_id: GroupId,
        study_activity_id: StudyActivityId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            group_id,
            study_activity_id,
            created_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> StudySessionId {
        self.id
    }

    #[must_use]
    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    #[must_use]
    pub fn study_activity_id(&self) -> StudyActivityId {
        self.study_activity_id
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// The most recent session together with the name of its group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastStudySession {
    pub session: StudySession,
    pub group_name: String,
}
