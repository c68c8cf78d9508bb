use crate::domain::gateway::PaymentGateway;
use crate::infrastructure::config::PaymentConfig;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
struct PaymentIntentResponse {
    id: String,
    client_secret: String,
}

/// Creates payment intents through a Stripe-compatible REST API.
pub struct StripeGateway {
    client: Client,
    api_base: String,
    secret_key: String,
}

impl StripeGateway {
    pub fn new(config: &PaymentConfig) -> Self {
        Self {
            client: Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    #[instrument(skip(self))]
    async fn create_intent(&self, amount_minor_units: u64, currency: &str) -> Result<String> {
        let url = format!("{}/v1/payment_intents", self.api_base);
        let amount = amount_minor_units.to_string();
        let form = [
            ("amount", amount.as_str()),
            ("currency", currency),
            ("payment_method_types[]", "card"),
        ];

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Payment gateway returned status {}",
                response.status()
            ));
        }

        let intent: PaymentIntentResponse = response.json().await?;
        debug!(intent_id = %intent.id, "Payment intent created");
        Ok(intent.client_secret)
    }
}
