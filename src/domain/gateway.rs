use crate::domain::money::Amount;
use crate::domain::transaction::TransactionStatus;
use serde::{Deserialize, Serialize};

/// Status vocabulary owned by the payment gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayStatus {
    Pending,
    Approved,
    Declined,
    Voided,
}

impl GatewayStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GatewayStatus::Pending)
    }

    /// The fixed mapping from the gateway's vocabulary to the backend's.
    /// The backend is the source of truth for display, the gateway for the
    /// payment outcome; this is the bridge between the two.
    pub fn as_transaction_status(&self) -> TransactionStatus {
        match self {
            GatewayStatus::Approved => TransactionStatus::Completed,
            GatewayStatus::Pending => TransactionStatus::Pending,
            GatewayStatus::Declined | GatewayStatus::Voided => TransactionStatus::Failed,
        }
    }
}

/// A charge as the gateway records it. Owned by the gateway; this system
/// creates and reads these but never mutates one directly.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GatewayTransaction {
    pub id: String,
    pub amount_in_cents: i64,
    pub reference: String,
    pub currency: String,
    pub status: GatewayStatus,
    pub status_message: Option<String>,
}

/// A tokenized card, safe to reference in charge requests.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CardToken {
    pub id: String,
    pub brand: String,
    pub last_four: String,
}

/// Everything needed to create a charge at the gateway. The amount always
/// comes from the backend's transaction record, never from client input.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub amount: Amount,
    pub currency: String,
    pub reference: String,
    pub card_token: String,
    pub acceptance_token: String,
    pub installments: u32,
    pub customer_email: String,
    pub customer_name: String,
    pub customer_phone: String,
}
