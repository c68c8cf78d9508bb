use crate::domain::error::DomainError;
use crate::domain::models::{CartEntry, DeleteOutcome, PaymentRecord};
use crate::domain::repository::CheckoutRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace, warn};

#[derive(Default)]
struct CheckoutTables {
    carts: Vec<CartEntry>,
    payments: Vec<PaymentRecord>,
}

impl CheckoutTables {
    fn insert_payment(&mut self, payment: PaymentRecord) -> Result<()> {
        if self.payments.iter().any(|p| p.id == payment.id) {
            return Err(DomainError::Storage(format!(
                "duplicate key: payment {} already recorded",
                payment.id
            ))
            .into());
        }
        self.payments.push(payment);
        Ok(())
    }
}

/// Carts and payments share one lock; holding it for the whole settlement
/// gives the delete+insert pair transactional isolation.
#[derive(Clone)]
pub struct InMemoryCheckoutRepository {
    tables: Arc<RwLock<CheckoutTables>>,
}

impl InMemoryCheckoutRepository {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(CheckoutTables::default())),
        }
    }
}

impl Default for InMemoryCheckoutRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CheckoutRepository for InMemoryCheckoutRepository {
    #[instrument(skip(self, entry), fields(entry_id = %entry.id, email = %entry.email))]
    async fn add_cart_entry(&self, entry: CartEntry) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.carts.push(entry);
        debug!(cart_size = tables.carts.len(), "Cart entry stored");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_cart_entries(&self, email: &str) -> Result<Vec<CartEntry>> {
        let tables = self.tables.read().await;
        Ok(tables
            .carts
            .iter()
            .filter(|e| e.email == email)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn remove_cart_entry(&self, id: &str) -> Result<DeleteOutcome> {
        let mut tables = self.tables.write().await;
        let before = tables.carts.len();
        tables.carts.retain(|e| e.id != id);
        let deleted = (before - tables.carts.len()) as u64;
        debug!(deleted = deleted, "Cart entry removal applied");
        Ok(DeleteOutcome::deleted(deleted))
    }

    #[instrument(
        skip(self, payment),
        fields(payment_id = %payment.id, items = payment.cart_items.len())
    )]
    async fn settle(&self, payment: PaymentRecord) -> Result<Vec<String>> {
        trace!("Opening settlement transaction");
        let mut tables = self.tables.write().await;

        let removed: Vec<String> = tables
            .carts
            .iter()
            .filter(|e| payment.cart_items.contains(&e.id))
            .map(|e| e.id.clone())
            .collect();

        // The cart is only touched once the payment is in the log
        if let Err(err) = tables.insert_payment(payment) {
            warn!(error = %err, "Settlement rolled back");
            return Err(err);
        }
        tables.carts.retain(|e| !removed.contains(&e.id));

        debug!(removed = removed.len(), "Settlement committed");
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn list_payments(&self, email: &str) -> Result<Vec<PaymentRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .payments
            .iter()
            .filter(|p| p.email.as_deref() == Some(email))
            .cloned()
            .collect())
    }

    async fn count_payments(&self) -> Result<u64> {
        Ok(self.tables.read().await.payments.len() as u64)
    }

    async fn total_revenue(&self) -> Result<f64> {
        let tables = self.tables.read().await;
        Ok(tables.payments.iter().map(|p| p.price).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn entry(id: &str, email: &str) -> CartEntry {
        CartEntry {
            id: id.to_string(),
            email: email.to_string(),
            details: Map::new(),
        }
    }

    fn payment(id: &str, price: f64, items: &[&str]) -> PaymentRecord {
        PaymentRecord {
            id: id.to_string(),
            email: Some("kim@example.com".to_string()),
            price,
            cart_items: items.iter().map(|s| s.to_string()).collect(),
            details: Map::new(),
        }
    }

    async fn seeded(ids: &[&str]) -> InMemoryCheckoutRepository {
        let repo = InMemoryCheckoutRepository::new();
        for id in ids {
            repo.add_cart_entry(entry(id, "kim@example.com")).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_settle_removes_entries_and_records_payment() {
        let repo = seeded(&["a", "b", "c", "d"]).await;

        let removed = repo
            .settle(payment("p1", 40.0, &["a", "b", "c"]))
            .await
            .unwrap();

        assert_eq!(removed, vec!["a", "b", "c"]);
        let left = repo.list_cart_entries("kim@example.com").await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, "d");
        assert_eq!(repo.count_payments().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_settle_failure_leaves_cart_untouched() {
        let repo = seeded(&["a", "b", "c"]).await;
        repo.settle(payment("p1", 10.0, &[])).await.unwrap();

        let result = repo.settle(payment("p1", 20.0, &["a", "b", "c"])).await;

        assert!(result.is_err());
        assert_eq!(repo.list_cart_entries("kim@example.com").await.unwrap().len(), 3);
        assert_eq!(repo.count_payments().await.unwrap(), 1);
        assert_eq!(repo.total_revenue().await.unwrap(), 10.0);
    }

    #[tokio::test]
    async fn test_settle_ignores_unknown_ids() {
        let repo = seeded(&["a"]).await;
        let removed = repo.settle(payment("p1", 5.0, &["zzz"])).await.unwrap();
        assert!(removed.is_empty());
        assert_eq!(repo.list_cart_entries("kim@example.com").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_settle_leaves_other_carts_alone() {
        let repo = seeded(&["a", "b"]).await;
        repo.add_cart_entry(entry("x", "lee@example.com")).await.unwrap();
        repo.add_cart_entry(entry("y", "lee@example.com")).await.unwrap();

        let removed = repo.settle(payment("p1", 15.0, &["b"])).await.unwrap();

        assert_eq!(removed, vec!["b"]);
        let mine = repo.list_cart_entries("kim@example.com").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "a");
        assert_eq!(repo.list_cart_entries("lee@example.com").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_remove_cart_entry_reports_deleted_count() {
        let repo = seeded(&["a"]).await;
        assert_eq!(repo.remove_cart_entry("a").await.unwrap().deleted_count, 1);
        assert_eq!(repo.remove_cart_entry("a").await.unwrap().deleted_count, 0);
    }

    #[tokio::test]
    async fn test_total_revenue_of_empty_log_is_zero() {
        let repo = InMemoryCheckoutRepository::new();
        assert_eq!(repo.total_revenue().await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_list_cart_entries_scoped_to_owner() {
        let repo = seeded(&["a"]).await;
        repo.add_cart_entry(entry("b", "other@example.com")).await.unwrap();
        let mine = repo.list_cart_entries("kim@example.com").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "a");
    }
}
