//! Order status in the lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status following FIX protocol semantics.
///
/// FIX Protocol Order Status (Tag 39):
/// - `0` = New
/// - `4` = Canceled
/// - `5` = Replaced
///
/// Transitions are one-shot: only `New` may move, and only to `Canceled`
/// or `Replaced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order accepted and working.
    #[default]
    New,
    /// Order canceled.
    Canceled,
    /// Order replaced by a cancel/replace request.
    Replaced,
}

impl OrderStatus {
    /// Returns true if the order can still be canceled or replaced.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        matches!(self, Self::New)
    }

    /// Returns true if no further transition is defined.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !self.is_actionable()
    }

    /// Returns true if `self -> to` is a defined transition.
    #[must_use]
    pub const fn can_transition_to(&self, to: Self) -> bool {
        matches!((self, to), (Self::New, Self::Canceled | Self::Replaced))
    }

    /// Get the FIX protocol tag 39 value.
    #[must_use]
    pub const fn fix_tag_value(&self) -> char {
        match self {
            Self::New => '0',
            Self::Canceled => '4',
            Self::Replaced => '5',
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "NEW"),
            Self::Canceled => write!(f, "CANCELED"),
            Self::Replaced => write!(f, "REPLACED"),
        }
    }
}
