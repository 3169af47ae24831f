//! Order type (market, limit, etc.).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order type specifying execution behavior (FIX tag 40).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Market order (`1`).
    #[default]
    Market,
    /// Limit order (`2`).
    Limit,
    /// Stop order (`3`).
    Stop,
    /// Stop-limit order (`4`).
    StopLimit,
}

impl OrderType {
    /// Returns true if this is a market order.
    ///
    /// Every other type must carry a positive price.
    #[must_use]
    pub const fn is_market(&self) -> bool {
        matches!(self, Self::Market)
    }

    /// FIX tag 40 value.
    #[must_use]
    pub const fn fix_code(&self) -> char {
        match self {
            Self::Market => '1',
            Self::Limit => '2',
            Self::Stop => '3',
            Self::StopLimit => '4',
        }
    }

    /// Parse a FIX tag 40 value.
    #[must_use]
    pub const fn from_fix_code(code: char) -> Option<Self> {
        match code {
            '1' => Some(Self::Market),
            '2' => Some(Self::Limit),
            '3' => Some(Self::Stop),
            '4' => Some(Self::StopLimit),
            _ => None,
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Market => write!(f, "MARKET"),
            Self::Limit => write!(f, "LIMIT"),
            Self::Stop => write!(f, "STOP"),
            Self::StopLimit => write!(f, "STOP_LIMIT"),
        }
    }
}
