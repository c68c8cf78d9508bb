use crate::application::auth_service::ensure_owner;
use crate::domain::error::DomainError;
use crate::domain::gateway::PaymentGateway;
use crate::domain::models::{
    CartEntry, DeleteOutcome, InsertOutcome, NewCartEntry, NewPayment, PaymentRecord,
    SettlementOutcome,
};
use crate::domain::repository::CheckoutRepository;
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// Converts a price in major currency units to the gateway's minor units.
pub fn to_minor_units(price: f64) -> Result<u64, DomainError> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::Validation(format!("invalid price: {}", price)));
    }
    Ok((price * 100.0).round() as u64)
}

pub struct CheckoutService<R: CheckoutRepository> {
    repository: Arc<R>,
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
}

impl<R: CheckoutRepository> CheckoutService<R> {
    pub fn new(repository: Arc<R>, gateway: Arc<dyn PaymentGateway>, currency: String) -> Self {
        Self {
            repository,
            gateway,
            currency,
        }
    }

    #[instrument(skip(self))]
    pub async fn cart_for(
        &self,
        caller_email: &str,
        target: Option<&str>,
    ) -> Result<Vec<CartEntry>> {
        let Some(target) = target else {
            return Ok(Vec::new());
        };
        ensure_owner(caller_email, target)?;
        self.repository.list_cart_entries(target).await
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn add_to_cart(&self, req: NewCartEntry) -> Result<InsertOutcome> {
        let entry = req.into_entry(Uuid::new_v4().simple().to_string());
        let id = entry.id.clone();
        self.repository.add_cart_entry(entry).await?;
        info!(entry_id = %id, "Cart entry added");
        Ok(InsertOutcome::inserted(id))
    }

    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, id: &str) -> Result<DeleteOutcome> {
        self.repository.remove_cart_entry(id).await
    }

    #[instrument(skip(self))]
    pub async fn create_payment_intent(&self, price: f64) -> Result<String> {
        let amount = to_minor_units(price)?;
        let secret = self
            .gateway
            .create_intent(amount, &self.currency)
            .await
            .map_err(|e| {
                error!(error = %e, amount = amount, "Payment intent creation failed");
                DomainError::Gateway(e.to_string())
            })?;
        info!(amount = amount, currency = %self.currency, "Payment intent created");
        Ok(secret)
    }

    /// Records the payment and clears the purchased cart entries as one unit.
    #[instrument(
        skip(self, payment),
        fields(price = payment.price, items = payment.cart_items.len())
    )]
    pub async fn settle(&self, payment: NewPayment) -> Result<SettlementOutcome> {
        let record = payment.into_record(Uuid::new_v4().simple().to_string());
        let receipt_id = record.id.clone();

        let removed = self.repository.settle(record).await.map_err(|e| {
            error!(receipt_id = %receipt_id, error = %e, "Settlement failed");
            e
        })?;

        info!(receipt_id = %receipt_id, removed = removed.len(), "Settlement completed");
        Ok(SettlementOutcome {
            insert_result: InsertOutcome::inserted(receipt_id),
            delete_result: DeleteOutcome::deleted(removed.len() as u64),
            removed_cart_item_ids: removed,
        })
    }

    #[instrument(skip(self))]
    pub async fn payment_history(
        &self,
        caller_email: &str,
        target: Option<&str>,
    ) -> Result<Vec<PaymentRecord>> {
        let Some(target) = target else {
            return Ok(Vec::new());
        };
        ensure_owner(caller_email, target)?;
        self.repository.list_payments(target).await
    }
}
