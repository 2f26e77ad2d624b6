//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `CategoryId` where a `BudgetId` is expected.
//! Ids minted on the client are UUIDs; ids owned by the backend are integers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate client-side UUID ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

/// Macro to generate wrappers for integer IDs assigned by the backend.
macro_rules! backend_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Returns the inner integer.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

typed_id!(
    AllocationId,
    "Identifier for an allocation within a budget draft, regenerated per edit session."
);

backend_id!(CategoryId, "Identifier for a backend-owned category.");
backend_id!(BudgetId, "Identifier for a persisted budget.");
backend_id!(GoalId, "Identifier for a persisted savings goal.");
backend_id!(
    BudgetCategoryId,
    "Identifier for a persisted budget-category allocation record."
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_allocation_id_is_unique() {
        assert_ne!(AllocationId::new(), AllocationId::new());
    }

    #[test]
    fn test_allocation_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = AllocationId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
        assert_eq!(id.to_string(), uuid.to_string());
    }

    #[test]
    fn test_allocation_id_from_str() {
        let uuid = Uuid::new_v4();
        let id = AllocationId::from_str(&uuid.to_string()).unwrap();
        assert_eq!(id.into_inner(), uuid);
        assert!(AllocationId::from_str("invalid").is_err());
    }

    #[test]
    fn test_backend_id_display_and_parse() {
        let id = CategoryId::from(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(CategoryId::from_str(" 42 ").unwrap(), id);
        assert!(BudgetId::from_str("abc").is_err());
    }

    #[test]
    fn test_backend_id_serializes_as_number() {
        let json = serde_json::to_string(&CategoryId(7)).unwrap();
        assert_eq!(json, "7");

        let parsed: BudgetCategoryId = serde_json::from_str("13").unwrap();
        assert_eq!(parsed, BudgetCategoryId(13));
    }
}
