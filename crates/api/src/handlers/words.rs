use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, rejection::JsonRejection},
    http::StatusCode,
};
use portal_core::model::WordId;
use services::WordService;

use crate::dto::{MessageDto, WordDto, WordRequest};
use crate::error::Problem;
use crate::query::{ListQuery, parse_id};

pub async fn list_words(
    Extension(service): Extension<Arc<WordService>>,
    query: ListQuery,
) -> Result<Json<Vec<WordDto>>, Problem> {
    let words = service.list_words(query.search(), query.page()).await?;
    Ok(Json(words.into_iter().map(WordDto::from).collect()))
}

pub async fn get_word(
    Extension(service): Extension<Arc<WordService>>,
    Path(raw_id): Path<String>,
) -> Result<Json<WordDto>, Problem> {
    let id: WordId = parse_id(&raw_id)?;
    Ok(Json(service.get_word(id).await?.into()))
}

pub async fn create_word(
    Extension(service): Extension<Arc<WordService>>,
    body: Result<Json<WordRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<WordDto>), Problem> {
    let Json(req) = body?;
    let word = service.create_word(req.into()).await?;
    Ok((StatusCode::CREATED, Json(word.into())))
}

pub async fn update_word(
    Extension(service): Extension<Arc<WordService>>,
    Path(raw_id): Path<String>,
    body: Result<Json<WordRequest>, JsonRejection>,
) -> Result<Json<WordDto>, Problem> {
    let id: WordId = parse_id(&raw_id)?;
    let Json(req) = body?;
    Ok(Json(service.update_word(id, req.into()).await?.into()))
}

pub async fn delete_word(
    Extension(service): Extension<Arc<WordService>>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageDto>, Problem> {
    let id: WordId = parse_id(&raw_id)?;
    service.delete_word(id).await?;
    Ok(Json(MessageDto::new("word deleted successfully")))
}
