//! Margin broadcast configuration.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::default_true;
use crate::application::services::{BroadcastSchedule, OrchestratorConfig};
use crate::domain::margin::MarginBroadcastConfig;

/// Margin broadcast settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginConfig {
    /// Broadcast while a session is active.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Time between snapshots (milliseconds).
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Stop-flag polling granularity (milliseconds).
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Reported account.
    #[serde(default = "default_account")]
    pub account: String,
    /// Reported currency.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Starting margin value.
    #[serde(default = "default_base_value")]
    pub base_value: Decimal,
    /// Reported margin level (percent).
    #[serde(default = "default_level_pct")]
    pub level_pct: Decimal,
    /// Excess margin as a fraction of the margin value.
    #[serde(default = "default_excess_ratio")]
    pub excess_ratio: Decimal,
    /// Maximum per-snapshot move of the value (percent). Zero keeps it fixed.
    #[serde(default)]
    pub jitter_pct: Decimal,
}

impl MarginConfig {
    /// Broadcast timing.
    #[must_use]
    pub const fn schedule(&self) -> BroadcastSchedule {
        BroadcastSchedule {
            interval: Duration::from_millis(self.interval_ms),
            tick: Duration::from_millis(self.tick_ms),
        }
    }

    /// Snapshot parameters.
    #[must_use]
    pub fn signal(&self) -> MarginBroadcastConfig {
        MarginBroadcastConfig {
            account: self.account.clone(),
            currency: self.currency.clone(),
            base_value: self.base_value,
            level_pct: self.level_pct,
            excess_ratio: self.excess_ratio,
            jitter_pct: self.jitter_pct,
        }
    }

    /// Orchestrator configuration.
    #[must_use]
    pub fn orchestrator(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            margin_enabled: self.enabled,
            schedule: self.schedule(),
            margin: self.signal(),
        }
    }
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: default_interval_ms(),
            tick_ms: default_tick_ms(),
            account: default_account(),
            currency: default_currency(),
            base_value: default_base_value(),
            level_pct: default_level_pct(),
            excess_ratio: default_excess_ratio(),
            jitter_pct: Decimal::ZERO,
        }
    }
}

const fn default_interval_ms() -> u64 {
    30_000
}

const fn default_tick_ms() -> u64 {
    100
}

fn default_account() -> String {
    MarginBroadcastConfig::default().account
}

fn default_currency() -> String {
    MarginBroadcastConfig::default().currency
}

fn default_base_value() -> Decimal {
    MarginBroadcastConfig::default().base_value
}

fn default_level_pct() -> Decimal {
    MarginBroadcastConfig::default().level_pct
}

fn default_excess_ratio() -> Decimal {
    MarginBroadcastConfig::default().excess_ratio
}
