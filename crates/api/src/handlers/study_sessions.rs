use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, rejection::JsonRejection},
    http::StatusCode,
};
use portal_core::model::StudySessionId;
use services::StudySessionService;

use crate::dto::{CreateReviewRequest, CreateStudySessionRequest, ReviewItemDto, StudySessionDto};
use crate::error::Problem;
use crate::query::{ListQuery, parse_id};

pub async fn list_study_sessions(
    Extension(service): Extension<Arc<StudySessionService>>,
    query: ListQuery,
) -> Result<Json<Vec<StudySessionDto>>, Problem> {
    let sessions = service.list_sessions(query.page()).await?;
    Ok(Json(sessions.into_iter().map(StudySessionDto::from).collect()))
}

pub async fn get_study_session(
    Extension(service): Extension<Arc<StudySessionService>>,
    Path(raw_id): Path<String>,
) -> Result<Json<StudySessionDto>, Problem> {
    let id: StudySessionId = parse_id(&raw_id)?;
    Ok(Json(service.get_session(id).await?.into()))
}

pub async fn create_study_session(
    Extension(service): Extension<Arc<StudySessionService>>,
    body: Result<Json<CreateStudySessionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StudySessionDto>), Problem> {
    let Json(req) = body?;
    let session = service
        .create_session(req.group_id, req.study_activity_id)
        .await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

pub async fn list_session_reviews(
    Extension(service): Extension<Arc<StudySessionService>>,
    Path(raw_id): Path<String>,
    query: ListQuery,
) -> Result<Json<Vec<ReviewItemDto>>, Problem> {
    let id: StudySessionId = parse_id(&raw_id)?;
    let reviews = service.list_reviews(id, query.page()).await?;
    Ok(Json(reviews.into_iter().map(ReviewItemDto::from).collect()))
}

pub async fn create_session_review(
    Extension(service): Extension<Arc<StudySessionService>>,
    Path(raw_id): Path<String>,
    body: Result<Json<CreateReviewRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ReviewItemDto>), Problem> {
    let id: StudySessionId = parse_id(&raw_id)?;
    let Json(req) = body?;
    let review = service
        .record_review(id, req.word_id, req.correct)
        .await?;
    Ok((StatusCode::CREATED, Json(review.into())))
}
