use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog entry as listed by the commerce backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Price in integer minor units.
    pub price: i64,
    pub stock: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Created,
    InProgress,
    Delivered,
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeliveryStatus::Created => "CREATED",
            DeliveryStatus::InProgress => "IN_PROGRESS",
            DeliveryStatus::Delivered => "DELIVERED",
        };
        f.write_str(name)
    }
}

/// A fulfillment record. This system only ever creates one (as a side effect
/// of a completed transaction) and reads it back; the backend owns its
/// lifecycle from then on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub id: String,
    pub product_id: String,
    pub customer_id: String,
    pub status: DeliveryStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The buyer identity attached to transactions and deliveries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}
