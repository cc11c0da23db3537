//! Typed IDs for type-safe entity references.
//!
//! A `JournalId` can never be passed where an `AccountId` is expected, even
//! though both are UUIDs underneath.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a UUID-backed identifier newtype.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new time-ordered ID (UUID v7).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wraps an existing UUID.
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

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

typed_id!(AccountId, "Identifier of a chart of accounts entry.");
typed_id!(JournalId, "Identifier of a journal entry header.");
typed_id!(JournalLineId, "Identifier of a single journal line.");
typed_id!(UserId, "Identifier of the user performing an operation.");
typed_id!(PeriodId, "Identifier of a closed accounting period.");
typed_id!(SaleId, "Identifier of a sales document.");
typed_id!(PurchaseId, "Identifier of a purchase document.");
typed_id!(PaymentId, "Identifier of a sale receipt or purchase payment.");
