//! Email delivery over SMTP.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde_json::json;
use tracing::info;

use courier_core::config::EmailConfig;
use courier_entity::notification::model::Notification;

use crate::adapter::{names, ChannelAdapter, ChannelError};
use crate::templates;

/// SMTP email adapter.
///
/// Built without configuration it stays installed but fails every delivery
/// with [`ChannelError::EmailNotConfigured`]; the failure lands in that
/// channel's outcome without affecting the others.
pub struct EmailAdapter {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
}

impl EmailAdapter {
    /// Build the adapter from optional SMTP configuration.
    pub fn new(config: Option<&EmailConfig>) -> Result<Self, ChannelError> {
        let Some(config) = config else {
            return Ok(Self {
                transport: None,
                from: "noreply@courier.local"
                    .parse()
                    .map_err(|e| ChannelError::Configuration(format!("Invalid from: {e}")))?,
            });
        };

        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| ChannelError::Configuration(format!("Invalid from address: {e}")))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| ChannelError::Configuration(format!("Invalid SMTP relay: {e}")))?
            .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: Some(builder.build()),
            from,
        })
    }
}

#[async_trait]
impl ChannelAdapter for EmailAdapter {
    fn name(&self) -> &'static str {
        names::EMAIL
    }

    async fn deliver(
        &self,
        notification: &Notification,
    ) -> Result<serde_json::Value, ChannelError> {
        let transport = self
            .transport
            .as_ref()
            .ok_or(ChannelError::EmailNotConfigured)?;

        let to: Mailbox = notification
            .recipient_key
            .parse()
            .map_err(|_| ChannelError::InvalidRecipient(notification.recipient_key.clone()))?;

        let content = templates::email_content(notification);

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&content.subject)
            .multipart(MultiPart::alternative_plain_html(
                content.text,
                content.html,
            ))
            .map_err(|e| ChannelError::Provider(format!("Failed to build message: {e}")))?;

        let response = transport
            .send(message)
            .await
            .map_err(|e| ChannelError::Provider(e.to_string()))?;

        info!(
            notification_id = %notification.id,
            recipient_key = %notification.recipient_key,
            "Email sent"
        );

        Ok(json!({
            "code": response.code().to_string(),
            "message": response.message().collect::<Vec<_>>().join(" "),
        }))
    }
}
