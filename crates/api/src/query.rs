//! Request decoding shared by the handlers.

use std::convert::Infallible;
use std::str::FromStr;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use portal_core::Page;
use portal_core::model::ParseIdError;
use portal_core::pagination::{parse_limit, parse_offset};

use crate::error::Problem;

/// Raw `limit`/`offset`/`q` query parameters.
///
/// Kept as strings so a malformed value falls back to its default instead of
/// rejecting the request. Extraction never fails: repeated keys keep their
/// first value and unknown keys are ignored.
#[derive(Debug, Default)]
pub struct ListQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub q: Option<String>,
}

impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match Query::<Vec<(String, String)>>::try_from_uri(&parts.uri) {
            Ok(Query(pairs)) => Ok(Self::from_pairs(pairs)),
            Err(err) => {
                tracing::debug!(error = %err, "ignoring undecodable query string");
                Ok(Self::default())
            }
        }
    }
}

impl ListQuery {
    fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "limit" => &mut query.limit,
                "offset" => &mut query.offset,
                "q" => &mut query.q,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    #[must_use]
    pub fn page(&self) -> Page {
        if let Err(err) = parse_limit(self.limit.as_deref()) {
            tracing::debug!(error = %err, "ignoring malformed limit");
        }
        if let Err(err) = parse_offset(self.offset.as_deref()) {
            tracing::debug!(error = %err, "ignoring malformed offset");
        }
        Page::from_raw(self.limit.as_deref(), self.offset.as_deref())
    }

    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.q.as_deref()
    }
}

/// Parse a path segment into an entity id, answering 400 when it is not one.
pub fn parse_id<T>(raw: &str) -> Result<T, Problem>
where
    T: FromStr<Err = ParseIdError>,
{
    raw.parse::<T>()
        .map_err(|err| Problem::bad_request(format!("{err}: {raw:?}")))
}
