use anyhow::Result;
use async_trait::async_trait;

/// External service that opens a payment intent and hands back the secret the
/// client uses to confirm the charge.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_intent(&self, amount_minor_units: u64, currency: &str) -> Result<String>;
}
