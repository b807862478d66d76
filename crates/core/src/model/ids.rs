use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest id a store can assign. `SQLite` rowids are signed 64-bit.
pub const MAX_ID: u64 = i64::MAX as u64;

/// Declares a store-assigned numeric identifier.
///
/// Each id wraps a `u64`, formats as `Name(value)` for `Debug`, as the bare
/// number for `Display`, and parses from a decimal string. Parsing and
/// deserializing reject values above [`MAX_ID`].
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "u64", into = "u64")]
        pub struct $name(u64);

        impl $name {
            #[must_use]
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the underlying u64 value
            #[must_use]
            pub fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<u64> for $name {
            type Error = ParseIdError;

            fn try_from(value: u64) -> Result<Self, Self::Error> {
                if value > MAX_ID {
                    return Err(ParseIdError {
                        kind: stringify!($name),
                    });
                }
                Ok(Self(value))
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> u64 {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s.parse::<u64>().map_err(|_| ParseIdError {
                    kind: stringify!($name),
                })?;
                Self::try_from(value)
            }
        }
    };
}

entity_id!(
    /// Unique identifier for a Word
    WordId
);
entity_id!(
    /// Unique identifier for a Group
    GroupId
);
entity_id!(
    /// Unique identifier for a StudyActivity
    StudyActivityId
);
entity_id!(
    /// Unique identifier for a StudySession
    StudySessionId
);
entity_id!(
    /// Unique identifier for a ReviewItem
    ReviewItemId
);

// ─── Parse Errors ──────────────────────────────────────────────────────────────

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl ParseIdError {
    /// Name of the id type that failed to parse.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_id_display() {
        let id = WordId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(format!("{id:?}"), "WordId(42)");
    }

    #[test]
    fn group_id_from_str() {
        let id: GroupId = "123".parse().unwrap();
        assert_eq!(id, GroupId::new(123));
    }

    #[test]
    fn session_id_from_str_invalid() {
        let err = "not-a-number".parse::<StudySessionId>().unwrap_err();
        assert_eq!(err.kind(), "StudySessionId");
        assert_eq!(err.to_string(), "invalid StudySessionId");
    }

    #[test]
    fn negative_ids_are_rejected() {
        assert!("-1".parse::<StudyActivityId>().is_err());
        assert!("-7".parse::<ReviewItemId>().is_err());
    }

    #[test]
    fn ids_above_rowid_range_are_rejected() {
        assert!("9223372036854775808".parse::<GroupId>().is_err());
        assert!("18446744073709551615".parse::<WordId>().is_err());
        assert_eq!(
            "9223372036854775807".parse::<GroupId>().unwrap().value(),
            MAX_ID
        );
        assert!(serde_json::from_str::<WordId>("9223372036854775808").is_err());
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&WordId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: WordId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, WordId::new(7));
    }
}
