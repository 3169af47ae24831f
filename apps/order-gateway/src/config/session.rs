//! FIX session identity configuration.

use serde::{Deserialize, Serialize};

use crate::fix::SessionId;
use crate::fix::tags::FIX_44;

/// Session identity used by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// BeginString.
    #[serde(default = "default_begin_string")]
    pub begin_string: String,
    /// Our CompID.
    #[serde(default = "default_sender_comp_id")]
    pub sender_comp_id: String,
    /// Counterparty CompID.
    #[serde(default = "default_target_comp_id")]
    pub target_comp_id: String,
}

impl SessionConfig {
    /// The configured session identity.
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        SessionId {
            begin_string: self.begin_string.clone(),
            sender_comp_id: self.sender_comp_id.clone(),
            target_comp_id: self.target_comp_id.clone(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            begin_string: default_begin_string(),
            sender_comp_id: default_sender_comp_id(),
            target_comp_id: default_target_comp_id(),
        }
    }
}

fn default_begin_string() -> String {
    FIX_44.to_string()
}

fn default_sender_comp_id() -> String {
    "GATEWAY".to_string()
}

fn default_target_comp_id() -> String {
    "CLIENT".to_string()
}
