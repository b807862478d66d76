//! Limit/offset pagination shared by every listing operation.
//!
//! Raw query input never fails a request: malformed values fall back to the
//! defaults and oversized limits are clamped.

use thiserror::Error;

/// Page size used when the caller supplies none (or an unusable one).
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page a single listing returns.
pub const MAX_LIMIT: u32 = 100;

/// Why a raw pagination value was ignored.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PageInputError {
    #[error("limit is not a number: {0}")]
    MalformedLimit(String),

    #[error("limit must be positive, got {0}")]
    NonPositiveLimit(i64),

    #[error("offset is not a number: {0}")]
    MalformedOffset(String),

    #[error("offset must not be negative, got {0}")]
    NegativeOffset(i64),
}

/// A validated window over an id-ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: u32,
    offset: u64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Page {
    /// Build a page, clamping `limit` into `1..=MAX_LIMIT`.
    #[must_use]
    pub fn new(limit: u32, offset: u64) -> Self {
        let limit = if limit == 0 {
            DEFAULT_LIMIT
        } else {
            limit.min(MAX_LIMIT)
        };
        Self { limit, offset }
    }

    /// Resolve raw query-string values, silently substituting defaults.
    #[must_use]
    pub fn from_raw(limit: Option<&str>, offset: Option<&str>) -> Self {
        let limit = parse_limit(limit).unwrap_or(DEFAULT_LIMIT);
        let offset = parse_offset(offset).unwrap_or(0);
        Self::new(limit, offset)
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Apply the page to an already ordered iterator.
    pub fn slice<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let skip = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let take = usize::try_from(self.limit).unwrap_or(usize::MAX);
        items.into_iter().skip(skip).take(take).collect()
    }
}

/// Parse a raw `limit`. Absent input yields the default.
///
/// # Errors
///
/// Returns `PageInputError` when the value is not a positive integer.
pub fn parse_limit(raw: Option<&str>) -> Result<u32, PageInputError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_LIMIT);
    };
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| PageInputError::MalformedLimit(raw.to_string()))?;
    if value <= 0 {
        return Err(PageInputError::NonPositiveLimit(value));
    }
    Ok(u32::try_from(value).unwrap_or(MAX_LIMIT).min(MAX_LIMIT))
}

/// Parse a raw `offset`. Absent input yields zero.
///
/// # Errors
///
/// Returns `PageInputError` when the value is not a non-negative integer.
pub fn parse_offset(raw: Option<&str>) -> Result<u64, PageInputError> {
    let Some(raw) = raw else {
        return Ok(0);
    };
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| PageInputError::MalformedOffset(raw.to_string()))?;
    u64::try_from(value).map_err(|_| PageInputError::NegativeOffset(value))
}
