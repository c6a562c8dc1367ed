//! Dispatch queue and scheduler configuration.

use serde::{Deserialize, Serialize};

/// Queue drain and expiry reclamation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Seconds between queue drain ticks.
    #[serde(default = "default_drain_interval")]
    pub drain_interval_seconds: u64,
    /// Cron expression for the expiry reclamation sweep.
    #[serde(default = "default_reclamation_schedule")]
    pub reclamation_schedule: String,
    /// Default maximum delivery attempts per notification.
    #[serde(default = "default_max_attempts")]
    pub default_max_attempts: i32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            drain_interval_seconds: default_drain_interval(),
            reclamation_schedule: default_reclamation_schedule(),
            default_max_attempts: default_max_attempts(),
        }
    }
}

fn default_drain_interval() -> u64 {
    5
}

/// Hourly, on the hour.
fn default_reclamation_schedule() -> String {
    "0 0 * * * *".to_string()
}

fn default_max_attempts() -> i32 {
    3
}
