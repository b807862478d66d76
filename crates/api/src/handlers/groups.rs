use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, rejection::JsonRejection},
    http::StatusCode,
};
use portal_core::model::{GroupId, WordId};
use services::GroupService;

use crate::dto::{
    GroupDto, GroupRequest, GroupWordRequest, MessageDto, StudySessionDto, WordDto,
};
use crate::error::Problem;
use crate::query::{ListQuery, parse_id};

pub async fn list_groups(
    Extension(service): Extension<Arc<GroupService>>,
    query: ListQuery,
) -> Result<Json<Vec<GroupDto>>, Problem> {
    let groups = service.list_groups(query.page()).await?;
    Ok(Json(groups.into_iter().map(GroupDto::from).collect()))
}

pub async fn get_group(
    Extension(service): Extension<Arc<GroupService>>,
    Path(raw_id): Path<String>,
) -> Result<Json<GroupDto>, Problem> {
    let id: GroupId = parse_id(&raw_id)?;
    Ok(Json(service.get_group(id).await?.into()))
}

pub async fn create_group(
    Extension(service): Extension<Arc<GroupService>>,
    body: Result<Json<GroupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<GroupDto>), Problem> {
    let Json(req) = body?;
    let group = service.create_group(req.name).await?;
    Ok((StatusCode::CREATED, Json(group.into())))
}

pub async fn update_group(
    Extension(service): Extension<Arc<GroupService>>,
    Path(raw_id): Path<String>,
    body: Result<Json<GroupRequest>, JsonRejection>,
) -> Result<Json<GroupDto>, Problem> {
    let id: GroupId = parse_id(&raw_id)?;
    let Json(req) = body?;
    Ok(Json(service.rename_group(id, req.name).await?.into()))
}

pub async fn delete_group(
    Extension(service): Extension<Arc<GroupService>>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageDto>, Problem> {
    let id: GroupId = parse_id(&raw_id)?;
    service.delete_group(id).await?;
    Ok(Json(MessageDto::new("group deleted successfully")))
}

pub async fn list_group_words(
    Extension(service): Extension<Arc<GroupService>>,
    Path(raw_id): Path<String>,
    query: ListQuery,
) -> Result<Json<Vec<WordDto>>, Problem> {
    let id: GroupId = parse_id(&raw_id)?;
    let words = service.list_group_words(id, query.page()).await?;
    Ok(Json(words.into_iter().map(WordDto::from).collect()))
}

pub async fn add_group_word(
    Extension(service): Extension<Arc<GroupService>>,
    Path(raw_id): Path<String>,
    body: Result<Json<GroupWordRequest>, JsonRejection>,
) -> Result<Json<GroupDto>, Problem> {
    let id: GroupId = parse_id(&raw_id)?;
    let Json(req) = body?;
    let group = service.add_word(id, req.word_id).await?;
    Ok(Json(group.into()))
}

pub async fn remove_group_word(
    Extension(service): Extension<Arc<GroupService>>,
    Path((raw_id, raw_word_id)): Path<(String, String)>,
) -> Result<Json<GroupDto>, Problem> {
    let id: GroupId = parse_id(&raw_id)?;
    let word_id: WordId = parse_id(&raw_word_id)?;
    Ok(Json(service.remove_word(id, word_id).await?.into()))
}

pub async fn list_group_study_sessions(
    Extension(service): Extension<Arc<GroupService>>,
    Path(raw_id): Path<String>,
    query: ListQuery,
) -> Result<Json<Vec<StudySessionDto>>, Problem> {
    let id: GroupId = parse_id(&raw_id)?;
    let sessions = service.list_group_study_sessions(id, query.page()).await?;
    Ok(Json(sessions.into_iter().map(StudySessionDto::from).collect()))
}
