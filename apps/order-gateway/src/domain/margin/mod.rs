//! Margin Snapshots
//!
//! Synthetic account margin figures pushed to the counterparty while a
//! session is active. The default configuration produces a fixed signal;
//! a non-zero jitter turns the margin value into a bounded random walk.

use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// A point-in-time margin snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginUpdate {
    /// Account the figures belong to.
    pub account: String,
    /// Margin value.
    pub margin_value: Decimal,
    /// Margin level, in percent.
    pub margin_level: Decimal,
    /// Excess margin.
    pub margin_excess: Decimal,
    /// Currency of the monetary figures.
    pub currency: String,
}

/// Parameters of the synthetic margin signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginBroadcastConfig {
    /// Account reported in every snapshot.
    pub account: String,
    /// Currency reported in every snapshot.
    pub currency: String,
    /// Starting margin value.
    pub base_value: Decimal,
    /// Reported margin level, in percent.
    pub level_pct: Decimal,
    /// Excess margin as a fraction of the margin value.
    pub excess_ratio: Decimal,
    /// Maximum per-snapshot move of the margin value, in percent.
    /// Zero keeps the value fixed.
    pub jitter_pct: Decimal,
}

impl Default for MarginBroadcastConfig {
    fn default() -> Self {
        Self {
            account: "ACC-001".to_string(),
            currency: "USD".to_string(),
            base_value: dec!(100000),
            level_pct: dec!(30),
            excess_ratio: dec!(0.7),
            jitter_pct: Decimal::ZERO,
        }
    }
}

/// Produces successive margin snapshots.
///
/// Only the last margin value is retained between snapshots.
#[derive(Debug, Clone)]
pub struct MarginSource {
    config: MarginBroadcastConfig,
    value: Decimal,
}

impl MarginSource {
    /// Start a source at the configured base value.
    #[must_use]
    pub fn new(config: MarginBroadcastConfig) -> Self {
        let value = config.base_value;
        Self { config, value }
    }

    /// Compute the next snapshot.
    pub fn next_snapshot(&mut self) -> MarginUpdate {
        if self.config.jitter_pct > Decimal::ZERO {
            self.value = self.walk(self.value);
        }
        MarginUpdate {
            account: self.config.account.clone(),
            margin_value: round_cents(self.value),
            margin_level: round_cents(self.config.level_pct),
            margin_excess: round_cents(self.value * self.config.excess_ratio),
            currency: self.config.currency.clone(),
        }
    }

    // Step in whole basis points, bounded by jitter_pct, floored at zero.
    fn walk(&self, value: Decimal) -> Decimal {
        let bound = (self.config.jitter_pct * dec!(100))
            .round()
            .to_i64()
            .unwrap_or(0);
        if bound == 0 {
            return value;
        }
        let step_bp = rand::rng().random_range(-bound..=bound);
        let next = value * (Decimal::ONE + Decimal::new(step_bp, 4));
        next.max(Decimal::ZERO)
    }
}

/// Round to two decimal places, half away from zero.
#[must_use]
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
