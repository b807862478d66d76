use portal_core::model::{
    Group, GroupId, GroupName, ReviewItem, ReviewItemId, StudyActivity, StudyActivityFields,
    StudyActivityId, StudySession, StudySessionId, Word, WordFields, WordId, WordParts,
};
use portal_core::Page;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn db(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

/// Commit failures mean the transaction's writes were not applied.
pub(crate) fn commit_failed(e: sqlx::Error) -> StorageError {
    tracing::warn!(error = %e, "transaction commit failed");
    StorageError::Conflict
}

pub(crate) fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

/// `LIMIT` and `OFFSET` bind values for a page.
pub(crate) fn page_bounds(page: Page) -> (i64, i64) {
    (
        i64::from(page.limit()),
        i64::try_from(page.offset()).unwrap_or(i64::MAX),
    )
}

pub(crate) fn map_word_row(row: &SqliteRow) -> Result<Word, StorageError> {
    let id = WordId::new(i64_to_u64("word id", row.try_get("id").map_err(ser)?)?);
    let parts: String = row.try_get("parts").map_err(ser)?;
    let fields = WordFields::new(
        row.try_get::<String, _>("malay").map_err(ser)?,
        row.try_get::<String, _>("jawi").map_err(ser)?,
        row.try_get::<String, _>("english").map_err(ser)?,
        WordParts::from_json_str(&parts).map_err(ser)?,
    )
    .map_err(ser)?;
    Ok(Word::new(id, fields))
}

pub(crate) fn map_group_row(row: &SqliteRow) -> Result<Group, StorageError> {
    let id = GroupId::new(i64_to_u64("group id", row.try_get("id").map_err(ser)?)?);
    let name = GroupName::new(row.try_get::<String, _>("name").map_err(ser)?).map_err(ser)?;
    let words_count: i64 = row.try_get("words_count").map_err(ser)?;
    let words_count = u32::try_from(words_count).map_err(|_| {
        StorageError::Serialization(format!("invalid words_count: {words_count}"))
    })?;
    Ok(Group::new(
        id,
        name,
        words_count,
        row.try_get("created_at").map_err(ser)?,
        row.try_get("updated_at").map_err(ser)?,
    ))
}

pub(crate) fn map_study_activity_row(row: &SqliteRow) -> Result<StudyActivity, StorageError> {
    let id = StudyActivityId::new(i64_to_u64(
        "study activity id",
        row.try_get("id").map_err(ser)?,
    )?);
    let fields = StudyActivityFields::new(
        row.try_get::<String, _>("name").map_err(ser)?,
        row.try_get::<String, _>("url").map_err(ser)?,
    )
    .map_err(ser)?;
    Ok(StudyActivity::new(id, fields))
}

pub(crate) fn map_study_session_row(row: &SqliteRow) -> Result<StudySession, StorageError> {
    Ok(StudySession::new(
        StudySessionId::new(i64_to_u64("study session id", row.try_get("id").map_err(ser)?)?),
        GroupId::new(i64_to_u64("group_id", row.try_get("group_id").map_err(ser)?)?),
        StudyActivityId::new(i64_to_u64(
            "study_activity_id",
            row.try_get("study_activity_id").map_err(ser)?,
        )?),
        row.try_get("created_at").map_err(ser)?,
    ))
}

pub(crate) fn map_review_item_row(row: &SqliteRow) -> Result<ReviewItem, StorageError> {
    Ok(ReviewItem::new(
        ReviewItemId::new(i64_to_u64("review item id", row.try_get("id").map_err(ser)?)?),
        WordId::new(i64_to_u64("word_id", row.try_get("word_id").map_err(ser)?)?),
        StudySessionId::new(i64_to_u64(
            "study_session_id",
            row.try_get("study_session_id").map_err(ser)?,
        )?),
        row.try_get("correct").map_err(ser)?,
        row.try_get("created_at").map_err(ser)?,
    ))
}

pub(crate) fn map_rows<T>(
    rows: &[SqliteRow],
    map: impl Fn(&SqliteRow) -> Result<T, StorageError>,
) -> Result<Vec<T>, StorageError> {
    rows.iter().map(map).collect()
}
