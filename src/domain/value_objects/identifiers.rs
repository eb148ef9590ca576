//! Strongly-typed identifiers.
//!
//! Every persisted entity is keyed by a database-assigned integer. Wrapping
//! them in distinct types keeps a task id from being passed where a user id
//! is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_identifier {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name($inner);

        impl $name {
            /// Wraps a raw identifier.
            #[must_use]
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            /// Returns the raw identifier.
            #[must_use]
            pub const fn value(self) -> $inner {
                self.0
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

define_identifier!(
    /// Internal user identifier (primary key of `users`).
    UserId(i64)
);

define_identifier!(
    /// Identity assigned by the external login platform (a Telegram user id).
    ExternalId(i64)
);

define_identifier!(
    /// Task identifier.
    TaskId(i64)
);

define_identifier!(
    /// Task type identifier (row of the `task_types` lookup table).
    TaskTypeId(i32)
);

define_identifier!(
    /// Wallet transaction identifier.
    WalletTransactionId(i64)
);
