//! Mailjet Send API v3.1 adapter.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use super::mailer::{CONTACT_SUBJECT, ContactMessage, Mailer};
use super::{ClientError, HTTP_TIMEOUT};
use crate::config::MailerSettings;

#[derive(Debug, Clone)]
pub struct MailjetMailer {
    http: reqwest::Client,
    settings: MailerSettings,
}

impl MailjetMailer {
    pub fn new(settings: MailerSettings) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self { http, settings })
    }

    fn support_email(&self) -> &str {
        self.settings
            .support_email
            .as_deref()
            .unwrap_or(&self.settings.from_email)
    }

    /// Request body sending `message` to the support inbox, replying to the sender.
    fn payload(&self, message: &ContactMessage) -> Value {
        json!({
            "Messages": [{
                "From": {
                    "Email": self.settings.from_email,
                    "Name": self.settings.from_name,
                },
                "To": [{ "Email": self.support_email() }],
                "ReplyTo": { "Email": message.email, "Name": message.name },
                "Subject": CONTACT_SUBJECT,
                "TextPart": message.text_body(),
            }]
        })
    }
}

#[async_trait]
impl Mailer for MailjetMailer {
    #[instrument(skip(self, message), fields(from = %message.email))]
    async fn send_contact(&self, message: &ContactMessage) -> Result<(), ClientError> {
        let url = format!("{}/v3.1/send", self.settings.api_base.trim_end_matches('/'));
        let response = self
            .http
            .post(url)
            .basic_auth(&self.settings.api_key, Some(&self.settings.api_secret))
            .json(&self.payload(message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Mailjet rejected the message");
            return Err(ClientError::Api {
                service: "mailjet",
                status: status.as_u16(),
                message,
            });
        }

        info!("Contact message forwarded to {}", self.support_email());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_targets_support_inbox() {
        let mailer = MailjetMailer::new(MailerSettings {
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            api_base: "https://api.mailjet.com".to_string(),
            from_email: "noreply@pronostics.fr".to_string(),
            from_name: "Pronostics".to_string(),
            support_email: Some("support@pronostics.fr".to_string()),
        })
        .unwrap();

        let payload = mailer.payload(&ContactMessage {
            name: "Marie".to_string(),
            email: "marie@exemple.fr".to_string(),
            phone: Some("0600000000".to_string()),
            message: "Bonjour".to_string(),
        });

        let sent = &payload["Messages"][0];
        assert_eq!(sent["To"][0]["Email"], "support@pronostics.fr");
        assert_eq!(sent["From"]["Email"], "noreply@pronostics.fr");
        assert_eq!(sent["ReplyTo"]["Email"], "marie@exemple.fr");
        assert_eq!(sent["Subject"], "Demande de support");
        assert!(sent["TextPart"].as_str().unwrap().contains("Phone: 0600000000"));
    }
}
