//! Stable string identifiers for world entities.
//!
//! Unlike a UUID-keyed domain, every id here is produced deterministically
//! by the core engine from `(seed, tick, counter)` — see
//! `polity_core::noise` — never from host randomness or wall-clock entropy.
//! These wrappers exist only to keep the id spaces from mixing at compile
//! time; they carry no generation logic of their own.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around a stable `String` id.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap a raw string into this id type.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Borrow the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_owned())
            }
        }
    };
}

define_id! {
    /// Identifier for a player.
    PlayerId
}

define_id! {
    /// Identifier for a law.
    LawId
}

define_id! {
    /// Identifier for a synthetic or advisor-originated event.
    EventId
}

define_id! {
    /// Identifier for a social/political movement.
    MovementId
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let p = PlayerId::new("p-1");
        let l = LawId::new("l-1");
        assert_eq!(p.as_str(), "p-1");
        assert_eq!(l.as_str(), "l-1");
    }

    #[test]
    fn id_roundtrip_serde() {
        let id = PlayerId::new("p-42");
        let json = serde_json::to_string(&id).expect("serialize");
        let restored: PlayerId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(id, restored);
    }
}
