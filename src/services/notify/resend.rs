use anyhow::Context;
use async_trait::async_trait;

use super::NotifyProvider;

pub struct ResendEmailProvider {
    api_key: String,
    from: String,
    to: String,
    client: reqwest::Client,
}

impl ResendEmailProvider {
    pub fn new(api_key: String, from: String, to: String) -> Self {
        Self {
            api_key,
            from,
            to,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NotifyProvider for ResendEmailProvider {
    async fn send(&self, subject: &str, body: &str) -> anyhow::Result<()> {
        if self.api_key.is_empty() || self.to.is_empty() {
            // No key configured = notifications disabled.
            tracing::debug!("skipping notification email (no Resend API key)");
            return Ok(());
        }

        self.client
            .post("https://api.resend.com/emails")
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "from": self.from,
                "to": [self.to],
                "subject": subject,
                "text": body,
            }))
            .send()
            .await
            .context("failed to send notification email")?
            .error_for_status()
            .context("Resend API returned error")?;

        Ok(())
    }
}
