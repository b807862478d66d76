use std::sync::Arc;

use portal_core::DashboardStats;
use portal_core::model::LastStudySession;
use portal_core::stats::StudyProgress;
use storage::repository::StatsRepository;

use crate::error::DashboardError;

/// Read-only dashboard figures, recomputed on every call.
#[derive(Clone)]
pub struct DashboardService {
    stats: Arc<dyn StatsRepository>,
}

impl DashboardService {
    #[must_use]
    pub fn new(stats: Arc<dyn StatsRepository>) -> Self {
        Self { stats }
    }

    /// Success rate, session and group totals and the current streak.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Storage` if the history cannot be read; no
    /// partial figures are returned.
    pub async fn quick_stats(&self) -> Result<DashboardStats, DashboardError> {
        let history = self.stats.study_history().await?;
        let stats = DashboardStats::from_history(&history);
        tracing::debug!(
            sessions = stats.total_study_sessions,
            streak = stats.study_streak_days,
            "dashboard stats computed"
        );
        Ok(stats)
    }

    /// # Errors
    ///
    /// Returns `DashboardError::Storage` if repository access fails.
    pub async fn last_study_session(&self) -> Result<Option<LastStudySession>, DashboardError> {
        Ok(self.stats.last_study_session().await?)
    }

    /// # Errors
    ///
    /// Returns `DashboardError::Storage` if repository access fails.
    pub async fn study_progress(&self) -> Result<StudyProgress, DashboardError> {
        Ok(self.stats.study_progress().await?)
    }
}
