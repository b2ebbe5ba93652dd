use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use super::MailProvider;

pub struct ResendMailProvider {
    api_url: String,
    api_key: String,
    from: String,
    client: reqwest::Client,
}

impl ResendMailProvider {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            api_url,
            api_key,
            from,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct SendResponse {
    id: String,
}

#[async_trait]
impl MailProvider for ResendMailProvider {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<String> {
        let payload = serde_json::json!({
            "from": self.from,
            "to": [to],
            "subject": subject,
            "text": body,
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("failed to reach mail provider")?
            .error_for_status()
            .context("mail provider returned error")?;

        let sent: SendResponse = response
            .json()
            .await
            .context("failed to parse mail provider response")?;

        Ok(sent.id)
    }
}
