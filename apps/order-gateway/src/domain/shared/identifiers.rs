//! Strongly-typed identifiers for orders and executions.
//!
//! These prevent mixing up a client-assigned `ClOrdID` with the
//! system-assigned `OrderID` or `ExecID`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the identifier is the empty string.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Consume and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_id!(OrderId, "System-assigned order identifier (FIX tag 37).");
define_id!(ExecId, "System-assigned execution identifier (FIX tag 17).");
define_id!(ClOrdId, "Client-assigned order identifier (FIX tags 11 / 41).");

/// Monotonic sequence backing `OrderId` / `ExecId` generation.
///
/// Starts at 1. Each instance is independent, so two services never share
/// sequence state.
#[derive(Debug)]
pub struct IdSequence {
    next: AtomicU64,
}

impl IdSequence {
    /// Create a sequence whose first value is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Take the next value.
    pub fn next_value(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Take the next value as an `OrderId`.
    pub fn next_order_id(&self) -> OrderId {
        OrderId::new(self.next_value().to_string())
    }

    /// Take the next value as an `ExecId`.
    pub fn next_exec_id(&self) -> ExecId {
        ExecId::new(self.next_value().to_string())
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
