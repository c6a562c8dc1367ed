//! Notification priority enumeration.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Priority level of a notification.
///
/// Priority drives the default expiry window and whether escalated
/// channels (email, SMS) are attempted during routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    /// Delivered on every eligible channel; 24 hour expiry.
    Urgent,
    /// Escalates to email; 72 hour expiry.
    High,
    /// Default; one week expiry.
    Normal,
    /// Two week expiry.
    Low,
}

impl NotificationPriority {
    /// Default expiry window for this priority.
    pub fn default_expiry(&self) -> Duration {
        match self {
            Self::Urgent => Duration::hours(24),
            Self::High => Duration::hours(72),
            Self::Normal => Duration::hours(168),
            Self::Low => Duration::hours(336),
        }
    }

    /// Return the priority as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Normal => "normal",
            Self::Low => "low",
        }
    }
}

impl Default for NotificationPriority {
    fn default() -> Self {
        Self::Normal
    }
}

impl fmt::Display for NotificationPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "urgent" => Ok(Self::Urgent),
            "high" => Ok(Self::High),
            "normal" => Ok(Self::Normal),
            "low" => Ok(Self::Low),
            other => Err(format!("unknown notification priority: '{other}'")),
        }
    }
}
