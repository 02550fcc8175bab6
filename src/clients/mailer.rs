use async_trait::async_trait;
use tracing::info;

use super::ClientError;

/// Subject line of support requests.
pub const CONTACT_SUBJECT: &str = "Demande de support";

/// A message left through the contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

impl ContactMessage {
    /// Plain-text body forwarded to the support inbox.
    pub fn text_body(&self) -> String {
        let phone = self.phone.as_deref().unwrap_or("-");
        format!(
            "From: {} <{}>\nPhone: {}\n\n{}",
            self.name, self.email, phone, self.message
        )
    }
}

#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug {
    async fn send_contact(&self, message: &ContactMessage) -> Result<(), ClientError>;
}

/// Writes contact messages to the log instead of sending them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_contact(&self, message: &ContactMessage) -> Result<(), ClientError> {
        info!(
            from = %message.email,
            subject = CONTACT_SUBJECT,
            body = %message.text_body(),
            "Contact message (mailer disabled)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_body_without_phone() {
        let message = ContactMessage {
            name: "Jean Dupont".to_string(),
            email: "jean@exemple.fr".to_string(),
            phone: None,
            message: "Mon abonnement ne s'affiche pas.".to_string(),
        };
        assert_eq!(
            message.text_body(),
            "From: Jean Dupont <jean@exemple.fr>\nPhone: -\n\nMon abonnement ne s'affiche pas."
        );
    }
}
