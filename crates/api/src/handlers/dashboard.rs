use std::sync::Arc;

use axum::{Extension, Json};
use services::DashboardService;

use crate::dto::{DashboardStatsDto, LastStudySessionDto, StudyProgressDto};
use crate::error::Problem;

pub async fn quick_stats(
    Extension(service): Extension<Arc<DashboardService>>,
) -> Result<Json<DashboardStatsDto>, Problem> {
    Ok(Json(service.quick_stats().await?.into()))
}

/// Latest session with its group name, `null` when nothing was studied yet.
pub async fn last_study_session(
    Extension(service): Extension<Arc<DashboardService>>,
) -> Result<Json<Option<LastStudySessionDto>>, Problem> {
    let last = service.last_study_session().await?;
    Ok(Json(last.map(LastStudySessionDto::from)))
}

pub async fn study_progress(
    Extension(service): Extension<Arc<DashboardService>>,
) -> Result<Json<StudyProgressDto>, Problem> {
    Ok(Json(service.study_progress().await?.into()))
}
