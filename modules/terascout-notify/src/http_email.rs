use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::error::NotifyError;
use crate::EmailSender;

/// Posts to a generic transactional-email HTTP API (Resend/SendGrid-shaped:
/// bearer auth, JSON body of `{from, to, subject, html}`).
pub struct HttpEmailSender {
    api_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl HttpEmailSender {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    async fn send(&self, from: &str, to: &str, subject: &str, html: &str) -> Result<(), NotifyError> {
        let payload = json!({
            "from": from,
            "to": to,
            "subject": subject,
            "html": html,
        });

        let resp = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            warn!(status, body = %body, "email provider returned non-success");
            Err(NotifyError::Provider { status, body })
        }
    }
}
