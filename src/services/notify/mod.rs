pub mod message;
pub mod phone;
pub mod resend;

use async_trait::async_trait;

/// Outbound transactional mail. Returns the provider-assigned message id on
/// success; delivery failure surfaces to the caller, nothing is retried.
#[async_trait]
pub trait MailProvider: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<String>;
}
