use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn without_id(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .filter(|(key, _)| key.as_str() != "_id")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ClassItem {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_email: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewClass {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_email: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl NewClass {
    pub fn into_class(self, id: String) -> ClassItem {
        ClassItem {
            id,
            instructor_email: self.instructor_email,
            details: without_id(&self.details),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Instructor {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// A pending class selection owned by the user with the matching email.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CartEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewCartEntry {
    pub email: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl NewCartEntry {
    pub fn into_entry(self, id: String) -> CartEntry {
        CartEntry {
            id,
            email: self.email,
            details: without_id(&self.details),
        }
    }
}

/// Receipt of a settled checkout. Written once, never updated.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub price: f64,
    #[serde(alias = "cartItemIds")]
    pub cart_items: Vec<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub price: f64,
    #[serde(default, alias = "cartItemIds")]
    pub cart_items: Vec<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl NewPayment {
    /// Uses the client-supplied `_id` when present, `fallback_id` otherwise.
    pub fn into_record(self, fallback_id: String) -> PaymentRecord {
        PaymentRecord {
            id: self.id.unwrap_or(fallback_id),
            email: self.email,
            price: self.price,
            cart_items: self.cart_items,
            details: self.details,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertOutcome {
    pub fn inserted(id: impl Into<String>) -> Self {
        Self {
            acknowledged: true,
            inserted_id: id.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteOutcome {
    pub fn deleted(count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count: count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SettlementOutcome {
    pub insert_result: InsertOutcome,
    pub delete_result: DeleteOutcome,
    pub removed_cart_item_ids: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub student_count: u64,
    pub class_count: u64,
    pub paid_class_count: u64,
    pub revenue: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentIntentRequest {
    pub price: f64,
}
