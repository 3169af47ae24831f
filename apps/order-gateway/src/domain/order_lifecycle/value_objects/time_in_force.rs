//! Time in force for orders.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Time in force specifying order validity duration (FIX tag 59).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    /// Valid for current trading day only (`0`).
    #[default]
    Day,
    /// Good-til-canceled (`1`).
    Gtc,
    /// At the opening (`2`).
    Opg,
    /// Immediate-or-cancel (`3`).
    Ioc,
    /// Fill-or-kill (`4`).
    Fok,
    /// At the close (`7`).
    Cls,
}

impl TimeInForce {
    /// FIX tag 59 value.
    #[must_use]
    pub const fn fix_code(&self) -> char {
        match self {
            Self::Day => '0',
            Self::Gtc => '1',
            Self::Opg => '2',
            Self::Ioc => '3',
            Self::Fok => '4',
            Self::Cls => '7',
        }
    }

    /// Parse a FIX tag 59 value.
    #[must_use]
    pub const fn from_fix_code(code: char) -> Option<Self> {
        match code {
            '0' => Some(Self::Day),
            '1' => Some(Self::Gtc),
            '2' => Some(Self::Opg),
            '3' => Some(Self::Ioc),
            '4' => Some(Self::Fok),
            '7' => Some(Self::Cls),
            _ => None,
        }
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "DAY"),
            Self::Gtc => write!(f, "GTC"),
            Self::Opg => write!(f, "OPG"),
            Self::Ioc => write!(f, "IOC"),
            Self::Fok => write!(f, "FOK"),
            Self::Cls => write!(f, "CLS"),
        }
    }
}
