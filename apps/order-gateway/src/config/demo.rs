//! Demo counterparty configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Scripted counterparty settings for the demo binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Pause between scripted requests (milliseconds).
    #[serde(default = "default_script_delay_ms")]
    pub script_delay_ms: u64,
    /// Stop after this many seconds; zero runs until Ctrl-C.
    #[serde(default)]
    pub run_for_secs: u64,
}

impl DemoConfig {
    /// Pause between scripted requests.
    #[must_use]
    pub const fn script_delay(&self) -> Duration {
        Duration::from_millis(self.script_delay_ms)
    }

    /// Run limit, if any.
    #[must_use]
    pub const fn run_for(&self) -> Option<Duration> {
        match self.run_for_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            script_delay_ms: default_script_delay_ms(),
            run_for_secs: 0,
        }
    }
}

const fn default_script_delay_ms() -> u64 {
    500
}
