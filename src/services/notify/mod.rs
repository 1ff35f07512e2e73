pub mod resend;

use async_trait::async_trait;

#[async_trait]
pub trait NotifyProvider: Send + Sync {
    async fn send(&self, subject: &str, body: &str) -> anyhow::Result<()>;
}
