use crate::domain::card::CardInstrument;
use crate::domain::catalog::{CustomerProfile, Delivery, Product};
use crate::domain::gateway::{CardToken, ChargeRequest, GatewayTransaction};
use crate::domain::transaction::{Transaction, TransactionStatus};
use crate::error::Result;
use async_trait::async_trait;

/// The commerce backend: source of truth for products, transactions and
/// deliveries as the rest of the system sees them.
#[async_trait]
pub trait CommerceBackend: Send + Sync {
    async fn products(&self) -> Result<Vec<Product>>;
    async fn create_transaction(
        &self,
        product_id: &str,
        customer: &CustomerProfile,
    ) -> Result<Transaction>;
    async fn transaction(&self, id: &str) -> Result<Transaction>;
    /// Idempotent status upsert keyed by transaction id; also records which
    /// gateway charge produced the status, when one exists.
    async fn patch_transaction_status(
        &self,
        id: &str,
        status: TransactionStatus,
        gateway_transaction_id: Option<&str>,
    ) -> Result<Transaction>;
    async fn transactions_by_customer(&self, customer_id: &str) -> Result<Vec<Transaction>>;
    async fn create_delivery(&self, product_id: &str, customer_id: &str) -> Result<Delivery>;
    async fn delivery(&self, id: &str) -> Result<Delivery>;
    async fn create_customer(&self, customer: &CustomerProfile) -> Result<CustomerProfile>;
}

/// The payment gateway: source of truth for the payment outcome.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// One-time usage-acceptance token, required on every charge.
    async fn acceptance_token(&self) -> Result<String>;
    async fn tokenize_card(&self, card: &CardInstrument) -> Result<CardToken>;
    async fn create_charge(&self, charge: &ChargeRequest) -> Result<GatewayTransaction>;
    async fn charge_status(&self, id: &str) -> Result<GatewayTransaction>;
}

pub type CommerceBackendBox = Box<dyn CommerceBackend>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
