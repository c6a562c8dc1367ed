//! SMS delivery via a Twilio-shaped REST provider.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use courier_core::config::SmsConfig;
use courier_entity::notification::model::Notification;

use crate::adapter::{names, ChannelAdapter, ChannelError};
use crate::templates;

#[derive(Debug, Deserialize)]
struct ProviderMessage {
    sid: String,
    status: String,
}

/// SMS adapter posting to the provider's Messages endpoint.
pub struct SmsAdapter {
    client: reqwest::Client,
    config: Option<SmsConfig>,
}

impl SmsAdapter {
    pub fn new(config: Option<SmsConfig>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ChannelAdapter for SmsAdapter {
    fn name(&self) -> &'static str {
        names::SMS
    }

    async fn deliver(
        &self,
        notification: &Notification,
    ) -> Result<serde_json::Value, ChannelError> {
        let config = self.config.as_ref().ok_or(ChannelError::SmsNotConfigured)?;

        let body = templates::sms_message(notification);
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            config.api_base, config.account_sid
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(&config.account_sid, Some(&config.auth_token))
            .form(&[
                ("Body", body.as_str()),
                ("From", config.from_number.as_str()),
                ("To", notification.recipient_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ChannelError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(ChannelError::Provider(format!(
                "provider returned {status}: {detail}"
            )));
        }

        let message: ProviderMessage = response
            .json()
            .await
            .map_err(|e| ChannelError::Provider(format!("Malformed provider response: {e}")))?;

        info!(
            notification_id = %notification.id,
            recipient_key = %notification.recipient_key,
            sid = %message.sid,
            "SMS sent"
        );

        Ok(json!({
            "sid": message.sid,
            "status": message.status,
        }))
    }
}
