use crate::config::PaymentConfig;
use crate::domain::card::CardInstrument;
use crate::domain::catalog::{CustomerProfile, Delivery, Product};
use crate::domain::gateway::ChargeRequest;
use crate::domain::money::Amount;
use crate::domain::ports::{CommerceBackendBox, PaymentGatewayBox};
use crate::domain::transaction::{Transaction, TransactionStatus};
use crate::error::{CheckoutError, Result};
use chrono::Utc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Delay before each gateway status poll. The table bounds both the attempt
/// ceiling and the total wait: at most three polls, at most 2.5s of sleeping.
const POLL_DELAYS: [Duration; 3] = [
    Duration::from_millis(500),
    Duration::from_millis(1000),
    Duration::from_millis(1000),
];

/// The main entry point for driving a checkout.
///
/// `CheckoutEngine` owns the two external collaborators behind their ports
/// and sequences the confirmation flow: tokenize the card, create the charge,
/// write the observed status to the backend, poll the gateway for a terminal
/// outcome and reconcile the backend with it.
pub struct CheckoutEngine {
    backend: CommerceBackendBox,
    gateway: PaymentGatewayBox,
    payment: PaymentConfig,
    customer: CustomerProfile,
}

impl CheckoutEngine {
    pub fn new(
        backend: CommerceBackendBox,
        gateway: PaymentGatewayBox,
        payment: PaymentConfig,
        customer: CustomerProfile,
    ) -> Self {
        Self {
            backend,
            gateway,
            payment,
            customer,
        }
    }

    pub fn customer(&self) -> &CustomerProfile {
        &self.customer
    }

    pub async fn products(&self) -> Result<Vec<Product>> {
        self.backend.products().await
    }

    /// Creates a pending backend transaction for a product, bought by the
    /// configured customer profile.
    pub async fn start_checkout(&self, product_id: &str) -> Result<Transaction> {
        let tx = self
            .backend
            .create_transaction(product_id, &self.customer)
            .await?;
        info!(transaction = %tx.id, amount = tx.amount, "checkout started");
        Ok(tx)
    }

    pub async fn transaction(&self, id: &str) -> Result<Transaction> {
        self.backend.transaction(id).await
    }

    pub async fn transactions(&self, customer_id: Option<&str>) -> Result<Vec<Transaction>> {
        let customer_id = customer_id.unwrap_or(&self.customer.id);
        self.backend.transactions_by_customer(customer_id).await
    }

    pub async fn delivery(&self, id: &str) -> Result<Delivery> {
        self.backend.delivery(id).await
    }

    pub async fn register_customer(&self) -> Result<CustomerProfile> {
        self.backend.create_customer(&self.customer).await
    }

    /// Confirms payment for a pending transaction.
    ///
    /// The flow is sequential except for one fan-out: card tokenization and
    /// the acceptance-token fetch have no ordering dependency and run
    /// concurrently, with join semantics. The charge amount is always the
    /// backend's recorded amount, never a caller-supplied one.
    ///
    /// The gateway's immediate status is written to the backend before any
    /// polling, so at least one update lands even if polling is interrupted.
    /// Poll failures are absorbed: a stale-but-valid status beats aborting a
    /// payment that may have already succeeded at the gateway. A second
    /// backend write happens only when polling observed a different status.
    pub async fn confirm(
        &self,
        transaction_id: &str,
        card: Option<&CardInstrument>,
    ) -> Result<Transaction> {
        let backend_tx = self.backend.transaction(transaction_id).await?;
        info!(
            transaction = %transaction_id,
            amount = backend_tx.amount,
            status = ?backend_tx.status,
            "confirming transaction"
        );

        let card = card
            .ok_or_else(|| CheckoutError::Validation("card data required".to_string()))?
            .normalized();
        card.validate()?;

        let amount = Amount::try_from(backend_tx.amount)?;

        debug!("tokenizing card and fetching acceptance token");
        let (token, acceptance_token) = tokio::try_join!(
            self.gateway.tokenize_card(&card),
            self.gateway.acceptance_token(),
        )?;
        debug!(token = %token.id, brand = %token.brand, last_four = %token.last_four, "card tokenized");

        // Unique per attempt so a retried confirmation cannot collide with an
        // earlier reference at the gateway.
        let reference = format!("TX_{}_{}", transaction_id, Utc::now().timestamp_millis());
        let charge = ChargeRequest {
            amount,
            currency: self.payment.currency.clone(),
            reference,
            card_token: token.id,
            acceptance_token,
            installments: self.payment.installments,
            customer_email: self.customer.email.clone(),
            customer_name: self.customer.name.clone(),
            customer_phone: self.customer.phone.clone(),
        };

        let gateway_tx = match self.gateway.create_charge(&charge).await {
            Ok(tx) => tx,
            Err(err) => {
                // No charge exists at the gateway; settle the backend record
                // as FAILED (best effort) before surfacing the rejection.
                warn!(%err, "charge creation failed, marking transaction failed");
                if let Err(patch_err) = self
                    .backend
                    .patch_transaction_status(transaction_id, TransactionStatus::Failed, None)
                    .await
                {
                    warn!(%patch_err, "could not mark transaction failed");
                }
                return Err(err);
            }
        };
        info!(charge = %gateway_tx.id, status = ?gateway_tx.status, "charge created");

        let initial_status = gateway_tx.status.as_transaction_status();
        let mut written = self
            .backend
            .patch_transaction_status(transaction_id, initial_status, Some(&gateway_tx.id))
            .await?;

        let mut observed = gateway_tx.status;
        for (attempt, delay) in POLL_DELAYS.iter().enumerate() {
            if observed.is_terminal() {
                break;
            }
            sleep(*delay).await;
            match self.gateway.charge_status(&gateway_tx.id).await {
                Ok(check) => {
                    debug!(
                        attempt = attempt + 1,
                        status = ?check.status,
                        message = check.status_message.as_deref().unwrap_or("none"),
                        "polled charge status"
                    );
                    observed = check.status;
                }
                Err(err) => {
                    // No new information; keep the last observed status.
                    warn!(attempt = attempt + 1, %err, "charge status poll failed");
                }
            }
        }

        let final_status = observed.as_transaction_status();
        if final_status != initial_status {
            info!(from = ?initial_status, to = ?final_status, "reconciling backend with polled status");
            written = self
                .backend
                .patch_transaction_status(transaction_id, final_status, Some(&gateway_tx.id))
                .await?;
        }

        Ok(Transaction {
            id: transaction_id.to_string(),
            product_id: backend_tx.product_id,
            amount: backend_tx.amount,
            status: written.status,
            created_at: backend_tx.created_at,
        })
    }

    /// Requests a delivery for a completed transaction. Fire and forget: a
    /// failure here is logged and swallowed, never rolled back into the
    /// payment outcome.
    pub async fn fulfill(&self, tx: &Transaction) -> Option<Delivery> {
        if tx.status != TransactionStatus::Completed {
            return None;
        }
        match self
            .backend
            .create_delivery(&tx.product_id, &self.customer.id)
            .await
        {
            Ok(delivery) => {
                info!(delivery = %delivery.id, transaction = %tx.id, "delivery requested");
                Some(delivery)
            }
            Err(err) => {
                warn!(%err, transaction = %tx.id, "delivery creation failed, payment stays completed");
                None
            }
        }
    }
}
