//! Delivery channel transport configuration.

use serde::{Deserialize, Serialize};

/// SMTP email transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// SMTP relay host.
    pub smtp_host: String,
    /// SMTP port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username for authentication.
    #[serde(default)]
    pub smtp_username: Option<String>,
    /// SMTP password for authentication.
    #[serde(default)]
    pub smtp_password: Option<String>,
    /// From address for outgoing mail.
    #[serde(default = "default_from")]
    pub from: String,
}

/// SMS provider configuration (Twilio-shaped REST API).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    /// Provider account identifier.
    pub account_sid: String,
    /// Provider auth token.
    pub auth_token: String,
    /// Sender phone number.
    pub from_number: String,
    /// Base URL of the provider API. Overridable for testing.
    #[serde(default = "default_sms_api_base")]
    pub api_base: String,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from() -> String {
    "noreply@courier.local".to_string()
}

fn default_sms_api_base() -> String {
    "https://api.twilio.com".to_string()
}
