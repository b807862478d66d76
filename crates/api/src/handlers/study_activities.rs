use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, rejection::JsonRejection},
    http::StatusCode,
};
use portal_core::model::StudyActivityId;
use services::StudyActivityService;

use crate::dto::{MessageDto, StudyActivityDto, StudyActivityRequest, StudySessionDto};
use crate::error::Problem;
use crate::query::{ListQuery, parse_id};

pub async fn list_study_activities(
    Extension(service): Extension<Arc<StudyActivityService>>,
    query: ListQuery,
) -> Result<Json<Vec<StudyActivityDto>>, Problem> {
    let activities = service.list_activities(query.page()).await?;
    Ok(Json(activities.into_iter().map(StudyActivityDto::from).collect()))
}

pub async fn get_study_activity(
    Extension(service): Extension<Arc<StudyActivityService>>,
    Path(raw_id): Path<String>,
) -> Result<Json<StudyActivityDto>, Problem> {
    let id: StudyActivityId = parse_id(&raw_id)?;
    Ok(Json(service.get_activity(id).await?.into()))
}

pub async fn create_study_activity(
    Extension(service): Extension<Arc<StudyActivityService>>,
    body: Result<Json<StudyActivityRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StudyActivityDto>), Problem> {
    let Json(req) = body?;
    let activity = service.create_activity(req.name, req.url).await?;
    Ok((StatusCode::CREATED, Json(activity.into())))
}

pub async fn update_study_activity(
    Extension(service): Extension<Arc<StudyActivityService>>,
    Path(raw_id): Path<String>,
    body: Result<Json<StudyActivityRequest>, JsonRejection>,
) -> Result<Json<StudyActivityDto>, Problem> {
    let id: StudyActivityId = parse_id(&raw_id)?;
    let Json(req) = body?;
    Ok(Json(service.update_activity(id, req.name, req.url).await?.into()))
}

pub async fn delete_study_activity(
    Extension(service): Extension<Arc<StudyActivityService>>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageDto>, Problem> {
    let id: StudyActivityId = parse_id(&raw_id)?;
    service.delete_activity(id).await?;
    Ok(Json(MessageDto::new("study activity deleted successfully")))
}

pub async fn list_study_activity_sessions(
    Extension(service): Extension<Arc<StudyActivityService>>,
    Path(raw_id): Path<String>,
    query: ListQuery,
) -> Result<Json<Vec<StudySessionDto>>, Problem> {
    let id: StudyActivityId = parse_id(&raw_id)?;
    let sessions = service.list_activity_study_sessions(id, query.page()).await?;
    Ok(Json(sessions.into_iter().map(StudySessionDto::from).collect()))
}
