//! Order lifecycle configuration.

use serde::{Deserialize, Serialize};

use crate::domain::order_lifecycle::{DEFAULT_ACCOUNT, LifecycleConfig};

/// Order handling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersConfig {
    /// Account assigned to orders without one.
    #[serde(default = "default_account")]
    pub default_account: String,
}

impl OrdersConfig {
    /// Lifecycle service configuration.
    #[must_use]
    pub fn lifecycle(&self) -> LifecycleConfig {
        LifecycleConfig {
            default_account: self.default_account.clone(),
        }
    }
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            default_account: default_account(),
        }
    }
}

fn default_account() -> String {
    DEFAULT_ACCOUNT.to_string()
}
