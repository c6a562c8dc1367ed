//! Recipient descriptor: the contact facts used to decide eligible channels.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A recipient descriptor.
///
/// At least one of `user_id` / `email` / `phone` must be present for a
/// submission to be accepted; the first present (in that order) becomes
/// the record's immutable `recipient_key`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recipient {
    /// Stable user identifier, if known.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Email address, enabling the email channel.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone number, enabling the SMS channel.
    #[serde(default)]
    pub phone: Option<String>,
    /// Mobile push device token, enabling the push channel.
    #[serde(default)]
    pub device_token: Option<String>,
    /// Per-channel opt-out map. A channel explicitly set to `false` is
    /// dropped from routing; unspecified channels remain included.
    #[serde(default)]
    pub preferences: Option<HashMap<String, bool>>,
}

impl Recipient {
    /// Resolve the recipient key: user id, then email, then phone.
    pub fn key(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .or(self.email.as_deref())
            .or(self.phone.as_deref())
    }

    /// Whether the recipient's preferences allow a channel.
    ///
    /// Opt-out semantics: only an explicit `false` suppresses a channel.
    pub fn allows_channel(&self, channel: &str) -> bool {
        match &self.preferences {
            Some(prefs) => prefs.get(channel).copied() != Some(false),
            None => true,
        }
    }
}
