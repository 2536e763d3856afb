//! Strongly typed identifiers.
//!
//! Every id wraps a UUID and is persisted as its lowercase hyphenated string.
//! `Ord` on the wrapper compares the UUID bytes, which agrees with the
//! lexicographic order of the stored text. Canonical match pairing relies on
//! that agreement: the store and the application must sort ids the same way.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when parsing any id from text.
pub type IdError = uuid::Error;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                // Hyphenated lowercase, the same form the store keeps.
                write!(f, "{}", self.0.hyphenated())
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

id_type!(
    /// A registered user.
    UserId
);
id_type!(
    /// A posted work (image plus metadata).
    WorkId
);
id_type!(SwipeId);
id_type!(MatchId);
id_type!(ReviewId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_stored_text() {
        let mut ids: Vec<UserId> = (0..64).map(|_| UserId::new()).collect();
        let mut texts: Vec<String> = ids.iter().map(|id| id.to_string()).collect();

        ids.sort();
        texts.sort();

        let sorted_texts: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        assert_eq!(sorted_texts, texts);
    }

    #[test]
    fn parses_display_form() {
        let id = WorkId::new();
        let parsed: WorkId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<WorkId>().is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = MatchId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }
}
