mod group;
mod ids;
mod review;
mod study_activity;
mod study_session;
mod word;

pub use ids::{GroupId, MAX_ID, ParseIdError, ReviewItemId, StudyActivityId, StudySessionId, WordId};

pub use group::{Group, GroupError, GroupName};
pub use review::ReviewItem;
pub use study_activity::{StudyActivity, StudyActivityError, StudyActivityFields};
pub use study_session::{LastStudySession, StudySession};
pub use word::{Word, WordError, WordFields, WordParts};
