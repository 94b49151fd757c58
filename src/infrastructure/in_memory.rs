use crate::domain::card::CardInstrument;
use crate::domain::catalog::{CustomerProfile, Delivery, DeliveryStatus, Product};
use crate::domain::gateway::{CardToken, ChargeRequest, GatewayStatus, GatewayTransaction};
use crate::domain::ports::{CommerceBackend, PaymentGateway};
use crate::domain::transaction::{Transaction, TransactionStatus};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// One recorded `PATCH` against a transaction, in call order.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchRecord {
    pub transaction_id: String,
    pub status: TransactionStatus,
    pub gateway_transaction_id: Option<String>,
}

#[derive(Clone)]
struct StoredTransaction {
    transaction: Transaction,
    customer_id: String,
}

/// An in-memory stand-in for the commerce backend.
///
/// Backs the offline demo flow and the engine tests. Every status patch is
/// recorded so tests can assert exactly how many backend writes a flow
/// produced.
#[derive(Default, Clone)]
pub struct InMemoryBackend {
    products: Arc<RwLock<Vec<Product>>>,
    transactions: Arc<RwLock<HashMap<String, StoredTransaction>>>,
    deliveries: Arc<RwLock<HashMap<String, Delivery>>>,
    customers: Arc<RwLock<HashMap<String, CustomerProfile>>>,
    patches: Arc<RwLock<Vec<PatchRecord>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(RwLock::new(products)),
            ..Self::default()
        }
    }

    pub async fn seed_transaction(&self, transaction: Transaction, customer_id: &str) {
        self.transactions.write().await.insert(
            transaction.id.clone(),
            StoredTransaction {
                transaction,
                customer_id: customer_id.to_string(),
            },
        );
    }

    /// All status patches applied so far, in call order.
    pub async fn patches(&self) -> Vec<PatchRecord> {
        self.patches.read().await.clone()
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}_{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl CommerceBackend for InMemoryBackend {
    async fn products(&self) -> Result<Vec<Product>> {
        Ok(self.products.read().await.clone())
    }

    async fn create_transaction(
        &self,
        product_id: &str,
        customer: &CustomerProfile,
    ) -> Result<Transaction> {
        let mut products = self.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or_else(|| CheckoutError::Upstream(format!("product {product_id} not found")))?;
        if product.stock == 0 {
            return Err(CheckoutError::Upstream(format!(
                "product {product_id} is out of stock"
            )));
        }
        product.stock -= 1;

        let transaction = Transaction {
            id: self.next_id("tx"),
            product_id: product_id.to_string(),
            amount: product.price,
            status: TransactionStatus::Pending,
            created_at: Utc::now(),
        };
        self.transactions.write().await.insert(
            transaction.id.clone(),
            StoredTransaction {
                transaction: transaction.clone(),
                customer_id: customer.id.clone(),
            },
        );
        Ok(transaction)
    }

    async fn transaction(&self, id: &str) -> Result<Transaction> {
        self.transactions
            .read()
            .await
            .get(id)
            .map(|stored| stored.transaction.clone())
            .ok_or_else(|| CheckoutError::Upstream(format!("transaction {id} not found")))
    }

    async fn patch_transaction_status(
        &self,
        id: &str,
        status: TransactionStatus,
        gateway_transaction_id: Option<&str>,
    ) -> Result<Transaction> {
        let mut transactions = self.transactions.write().await;
        let stored = transactions
            .get_mut(id)
            .ok_or_else(|| CheckoutError::Upstream(format!("transaction {id} not found")))?;
        stored.transaction.status = status;
        self.patches.write().await.push(PatchRecord {
            transaction_id: id.to_string(),
            status,
            gateway_transaction_id: gateway_transaction_id.map(str::to_string),
        });
        Ok(stored.transaction.clone())
    }

    async fn transactions_by_customer(&self, customer_id: &str) -> Result<Vec<Transaction>> {
        Ok(self
            .transactions
            .read()
            .await
            .values()
            .filter(|stored| stored.customer_id == customer_id)
            .map(|stored| stored.transaction.clone())
            .collect())
    }

    async fn create_delivery(&self, product_id: &str, customer_id: &str) -> Result<Delivery> {
        let delivery = Delivery {
            id: self.next_id("dlv"),
            product_id: product_id.to_string(),
            customer_id: customer_id.to_string(),
            status: DeliveryStatus::Created,
            created_at: Some(Utc::now()),
        };
        self.deliveries
            .write()
            .await
            .insert(delivery.id.clone(), delivery.clone());
        Ok(delivery)
    }

    async fn delivery(&self, id: &str) -> Result<Delivery> {
        self.deliveries
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| CheckoutError::Upstream(format!("delivery {id} not found")))
    }

    async fn create_customer(&self, customer: &CustomerProfile) -> Result<CustomerProfile> {
        let mut created = customer.clone();
        if created.id.is_empty() {
            created.id = self.next_id("cus");
        }
        self.customers
            .write()
            .await
            .insert(created.id.clone(), created.clone());
        Ok(created)
    }
}

/// An in-memory stand-in for the payment gateway.
///
/// Without a script it renders an immediate verdict from the card number the
/// way the offline demo rules do: 4000/4100-prefixed cards decline, anything
/// else approves. A scripted instance instead starts every charge at a fixed
/// status and feeds poll responses from a queue, which is how tests exercise
/// the PENDING-then-terminal path.
#[derive(Default, Clone)]
pub struct SimulatedGateway {
    charges: Arc<RwLock<HashMap<String, GatewayTransaction>>>,
    token_verdicts: Arc<RwLock<HashMap<String, GatewayStatus>>>,
    poll_script: Arc<RwLock<VecDeque<GatewayStatus>>>,
    initial_override: Option<GatewayStatus>,
    fail_tokenize: bool,
    fail_charge: bool,
    fail_status_polls: bool,
    next_id: Arc<AtomicU64>,
    tokenize_count: Arc<AtomicUsize>,
    acceptance_count: Arc<AtomicUsize>,
    charge_count: Arc<AtomicUsize>,
    status_count: Arc<AtomicUsize>,
}

const DECLINED_PREFIXES: [&str; 2] = ["4000", "4100"];

impl SimulatedGateway {
    /// Verdict by card prefix, immediately terminal.
    pub fn approving() -> Self {
        Self::default()
    }

    /// Charges start at `initial`; successive status polls consume `polls`
    /// and then hold the last value.
    pub fn scripted(initial: GatewayStatus, polls: Vec<GatewayStatus>) -> Self {
        Self {
            initial_override: Some(initial),
            poll_script: Arc::new(RwLock::new(polls.into())),
            ..Self::default()
        }
    }

    pub fn failing_tokenization() -> Self {
        Self {
            fail_tokenize: true,
            ..Self::default()
        }
    }

    pub fn failing_charge() -> Self {
        Self {
            fail_charge: true,
            ..Self::default()
        }
    }

    pub fn with_failing_status_polls(mut self) -> Self {
        self.fail_status_polls = true;
        self
    }

    pub fn tokenize_calls(&self) -> usize {
        self.tokenize_count.load(Ordering::SeqCst)
    }

    pub fn acceptance_calls(&self) -> usize {
        self.acceptance_count.load(Ordering::SeqCst)
    }

    pub fn charge_calls(&self) -> usize {
        self.charge_count.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_count.load(Ordering::SeqCst)
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}_{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn acceptance_token(&self) -> Result<String> {
        self.acceptance_count.fetch_add(1, Ordering::SeqCst);
        Ok("sim-acceptance-token".to_string())
    }

    async fn tokenize_card(&self, card: &CardInstrument) -> Result<CardToken> {
        self.tokenize_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_tokenize {
            return Err(CheckoutError::Gateway(
                "card could not be tokenized".to_string(),
            ));
        }
        let verdict = if DECLINED_PREFIXES.iter().any(|p| card.number.starts_with(p)) {
            GatewayStatus::Declined
        } else {
            GatewayStatus::Approved
        };
        let token = CardToken {
            id: self.next_id("tok"),
            brand: "VISA".to_string(),
            last_four: card.last_four(),
        };
        self.token_verdicts
            .write()
            .await
            .insert(token.id.clone(), verdict);
        Ok(token)
    }

    async fn create_charge(&self, charge: &ChargeRequest) -> Result<GatewayTransaction> {
        self.charge_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_charge {
            return Err(CheckoutError::Gateway(
                "charge rejected by gateway".to_string(),
            ));
        }
        let verdict = self
            .token_verdicts
            .read()
            .await
            .get(&charge.card_token)
            .copied()
            .unwrap_or(GatewayStatus::Approved);
        let status = self.initial_override.unwrap_or(verdict);
        let transaction = GatewayTransaction {
            id: self.next_id("chg"),
            amount_in_cents: charge.amount.in_minor_units(),
            reference: charge.reference.clone(),
            currency: charge.currency.clone(),
            status,
            status_message: match status {
                GatewayStatus::Declined => Some("card declined by issuer".to_string()),
                _ => None,
            },
        };
        self.charges
            .write()
            .await
            .insert(transaction.id.clone(), transaction.clone());
        Ok(transaction)
    }

    async fn charge_status(&self, id: &str) -> Result<GatewayTransaction> {
        self.status_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_status_polls {
            return Err(CheckoutError::Gateway(
                "charge status unavailable".to_string(),
            ));
        }
        let mut charges = self.charges.write().await;
        let charge = charges
            .get_mut(id)
            .ok_or_else(|| CheckoutError::Gateway(format!("charge {id} not found")))?;
        if let Some(next) = self.poll_script.write().await.pop_front() {
            charge.status = next;
        }
        Ok(charge.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Amount;

    fn card(number: &str) -> CardInstrument {
        CardInstrument {
            number: number.to_string(),
            cvc: "123".to_string(),
            exp_month: "12".to_string(),
            exp_year: "29".to_string(),
            holder: "Demo Customer".to_string(),
        }
    }

    fn charge_for(token: CardToken) -> ChargeRequest {
        ChargeRequest {
            amount: Amount::new(10000).unwrap(),
            currency: "COP".to_string(),
            reference: "TX_tx_1_1".to_string(),
            card_token: token.id,
            acceptance_token: "sim-acceptance-token".to_string(),
            installments: 1,
            customer_email: "demo@example.com".to_string(),
            customer_name: "Demo Customer".to_string(),
            customer_phone: "+573001234567".to_string(),
        }
    }

    #[tokio::test]
    async fn test_backend_create_and_patch() {
        let backend = InMemoryBackend::with_products(vec![Product {
            id: "prd_1".to_string(),
            name: "Keyboard".to_string(),
            price: 10000,
            stock: 1,
        }]);
        let customer = CustomerProfile {
            id: "cus_1".to_string(),
            name: "Demo Customer".to_string(),
            email: "demo@example.com".to_string(),
            phone: String::new(),
        };

        let tx = backend.create_transaction("prd_1", &customer).await.unwrap();
        assert_eq!(tx.amount, 10000);
        assert_eq!(tx.status, TransactionStatus::Pending);

        let patched = backend
            .patch_transaction_status(&tx.id, TransactionStatus::Completed, Some("chg_1"))
            .await
            .unwrap();
        assert_eq!(patched.status, TransactionStatus::Completed);
        assert_eq!(backend.patches().await.len(), 1);

        // Stock was consumed; a second purchase fails.
        assert!(backend.create_transaction("prd_1", &customer).await.is_err());
    }

    #[tokio::test]
    async fn test_backend_unknown_ids_are_upstream_errors() {
        let backend = InMemoryBackend::new();
        assert!(matches!(
            backend.transaction("tx_missing").await,
            Err(CheckoutError::Upstream(_))
        ));
        assert!(matches!(
            backend.delivery("dlv_missing").await,
            Err(CheckoutError::Upstream(_))
        ));
    }

    #[tokio::test]
    async fn test_gateway_verdict_follows_card_prefix() {
        let gateway = SimulatedGateway::approving();

        let token = gateway.tokenize_card(&card("4000000000000002")).await.unwrap();
        let declined = gateway.create_charge(&charge_for(token)).await.unwrap();
        assert_eq!(declined.status, GatewayStatus::Declined);
        assert!(declined.status_message.is_some());

        let token = gateway.tokenize_card(&card("4242424242424242")).await.unwrap();
        let approved = gateway.create_charge(&charge_for(token)).await.unwrap();
        assert_eq!(approved.status, GatewayStatus::Approved);
    }

    #[tokio::test]
    async fn test_gateway_scripted_polls() {
        let gateway = SimulatedGateway::scripted(
            GatewayStatus::Pending,
            vec![GatewayStatus::Pending, GatewayStatus::Approved],
        );
        let token = gateway.tokenize_card(&card("4242424242424242")).await.unwrap();
        let created = gateway.create_charge(&charge_for(token)).await.unwrap();
        assert_eq!(created.status, GatewayStatus::Pending);

        let first = gateway.charge_status(&created.id).await.unwrap();
        assert_eq!(first.status, GatewayStatus::Pending);
        let second = gateway.charge_status(&created.id).await.unwrap();
        assert_eq!(second.status, GatewayStatus::Approved);
        // Script exhausted; the status holds.
        let third = gateway.charge_status(&created.id).await.unwrap();
        assert_eq!(third.status, GatewayStatus::Approved);
    }
}
