//! HTTP error mapping to RFC-9457 Problem Details

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use services::{
    DashboardError, ErrorKind, GroupServiceError, StudyActivityServiceError,
    StudySessionServiceError, WordServiceError,
};

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    pub title: String,

    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request").with_detail(detail)
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Every malformed body is a 400, whatever stage of decoding failed.
impl From<JsonRejection> for Problem {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

fn from_kind(kind: ErrorKind, error: &dyn std::error::Error) -> Problem {
    match kind {
        ErrorKind::Validation => {
            Problem::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(error.to_string())
        }
        ErrorKind::NotFound => {
            Problem::new(StatusCode::NOT_FOUND, "Not Found").with_detail(error.to_string())
        }
        ErrorKind::Storage | ErrorKind::Conflict => {
            tracing::error!(error = %error, "internal error");
            Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                .with_detail("An unexpected error occurred")
        }
    }
}

impl From<WordServiceError> for Problem {
    fn from(error: WordServiceError) -> Self {
        from_kind(error.kind(), &error)
    }
}

impl From<GroupServiceError> for Problem {
    fn from(error: GroupServiceError) -> Self {
        from_kind(error.kind(), &error)
    }
}

impl From<StudyActivityServiceError> for Problem {
    fn from(error: StudyActivityServiceError) -> Self {
        from_kind(error.kind(), &error)
    }
}

impl From<StudySessionServiceError> for Problem {
    fn from(error: StudySessionServiceError) -> Self {
        from_kind(error.kind(), &error)
    }
}

impl From<DashboardError> for Problem {
    fn from(error: DashboardError) -> Self {
        from_kind(error.kind(), &error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use portal_core::model::WordId;
    use services::StorageError;

    #[test]
    fn internal_errors_hide_details() {
        let problem = Problem::from(DashboardError::Storage(StorageError::Connection(
            "pool closed".into(),
        )));
        assert_eq!(problem.status, 500);
        assert_eq!(problem.detail.as_deref(), Some("An unexpected error occurred"));
    }

    #[test]
    fn not_found_keeps_the_message() {
        let problem = Problem::from(WordServiceError::NotFound(WordId::new(9)));
        assert_eq!(problem.status, 404);
        assert_eq!(problem.detail.as_deref(), Some("word 9 not found"));
        assert_eq!(problem.type_uri, "https://httpstatuses.io/404");
    }
}
