use async_trait::async_trait;
use serde::Serialize;

use crate::configuration::EmailSettings;
use crate::error::EmailError;

/// Outbound mail contract. Consumed by registration to dispatch the
/// verification link; delivery failures are logged by the caller, never
/// fatal to registration.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_content: &str,
    ) -> Result<(), EmailError>;
}

#[derive(Clone)]
pub struct EmailClient {
    http_client: reqwest::Client,
    base_url: String,
    sender: String,
}

#[derive(Serialize)]
struct SendEmailRequest {
    from: String,
    to: String,
    #[serde(rename = "Html")]
    html: String,
    #[serde(rename = "Subject")]
    subject: String,
}

impl EmailClient {
    pub fn new(settings: &EmailSettings, http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            base_url: settings.base_url.clone(),
            sender: settings.sender.clone(),
        }
    }
}

#[async_trait]
impl Mailer for EmailClient {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_content: &str,
    ) -> Result<(), EmailError> {
        if recipient.is_empty() {
            return Err(EmailError::InvalidRecipient(
                "recipient is empty".to_string(),
            ));
        }

        let url = format!("{}/email", self.base_url);
        let request = SendEmailRequest {
            from: self.sender.clone(),
            to: recipient.to_string(),
            subject: subject.to_string(),
            html: html_content.to_string(),
        };

        self.http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> EmailClient {
        EmailClient::new(
            &EmailSettings {
                base_url: "http://127.0.0.1:1".to_string(),
                sender: "no-reply@example.com".to_string(),
            },
            reqwest::Client::new(),
        )
    }

    #[tokio::test]
    async fn empty_recipient_is_rejected_before_any_request() {
        let err = client().send("", "subject", "body").await.unwrap_err();
        assert!(matches!(err, EmailError::InvalidRecipient(_)));
    }

    #[tokio::test]
    async fn unreachable_service_surfaces_send_failure() {
        let err = client()
            .send("user@example.com", "subject", "body")
            .await
            .unwrap_err();
        assert!(matches!(err, EmailError::SendFailed(_)));
    }
}
