use crate::config::BackendConfig;
use crate::domain::catalog::{CustomerProfile, Delivery, Product};
use crate::domain::ports::CommerceBackend;
use crate::domain::transaction::{Transaction, TransactionStatus};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const API_KEY_HEADER: &str = "x-api-key";

/// HTTP adapter for the commerce backend REST API.
///
/// Responses arrive snake_case and are mapped into domain types; request
/// bodies use the backend's camelCase field names. Every request carries the
/// static API key header.
pub struct HttpCommerceBackend {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct TransactionDto {
    id: String,
    product_id: String,
    #[serde(default)]
    amount: Option<i64>,
    status: TransactionStatus,
    created_at: DateTime<Utc>,
}

impl TransactionDto {
    fn into_domain(self) -> Transaction {
        Transaction {
            id: self.id,
            product_id: self.product_id,
            amount: self.amount.unwrap_or(0),
            status: self.status,
            created_at: self.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTransactionBody<'a> {
    product_id: &'a str,
    customer_id: &'a str,
    customer_name: &'a str,
    customer_email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PatchTransactionBody<'a> {
    status: TransactionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    gateway_transaction_id: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateDeliveryBody<'a> {
    customer_id: &'a str,
    product_id: &'a str,
}

#[derive(Serialize)]
struct CreateCustomerBody<'a> {
    name: &'a str,
    email: &'a str,
    phone: &'a str,
}

impl HttpCommerceBackend {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| CheckoutError::Upstream(format!("backend unreachable: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::Upstream(format!("backend unreachable: {e}")))?;

        if !status.is_success() {
            return Err(CheckoutError::Upstream(format!("backend returned {status}")));
        }
        serde_json::from_str(&body)
            .map_err(|e| CheckoutError::Upstream(format!("invalid backend response: {e}")))
    }
}

#[async_trait]
impl CommerceBackend for HttpCommerceBackend {
    async fn products(&self) -> Result<Vec<Product>> {
        self.send(self.http.get(self.url("/products"))).await
    }

    async fn create_transaction(
        &self,
        product_id: &str,
        customer: &CustomerProfile,
    ) -> Result<Transaction> {
        let body = CreateTransactionBody {
            product_id,
            customer_id: &customer.id,
            customer_name: &customer.name,
            customer_email: &customer.email,
        };
        let dto: TransactionDto = self
            .send(self.http.post(self.url("/transactions")).json(&body))
            .await?;
        Ok(dto.into_domain())
    }

    async fn transaction(&self, id: &str) -> Result<Transaction> {
        let dto: TransactionDto = self
            .send(self.http.get(self.url(&format!("/transactions/{id}"))))
            .await?;
        Ok(dto.into_domain())
    }

    async fn patch_transaction_status(
        &self,
        id: &str,
        status: TransactionStatus,
        gateway_transaction_id: Option<&str>,
    ) -> Result<Transaction> {
        let body = PatchTransactionBody {
            status,
            gateway_transaction_id,
        };
        let dto: TransactionDto = self
            .send(
                self.http
                    .patch(self.url(&format!("/transactions/{id}")))
                    .json(&body),
            )
            .await?;
        Ok(dto.into_domain())
    }

    async fn transactions_by_customer(&self, customer_id: &str) -> Result<Vec<Transaction>> {
        let dtos: Vec<TransactionDto> = self
            .send(
                self.http
                    .get(self.url("/transactions"))
                    .query(&[("customerId", customer_id)]),
            )
            .await?;
        Ok(dtos.into_iter().map(TransactionDto::into_domain).collect())
    }

    async fn create_delivery(&self, product_id: &str, customer_id: &str) -> Result<Delivery> {
        let body = CreateDeliveryBody {
            customer_id,
            product_id,
        };
        self.send(self.http.post(self.url("/deliveries")).json(&body))
            .await
    }

    async fn delivery(&self, id: &str) -> Result<Delivery> {
        self.send(self.http.get(self.url(&format!("/deliveries/{id}"))))
            .await
    }

    async fn create_customer(&self, customer: &CustomerProfile) -> Result<CustomerProfile> {
        let body = CreateCustomerBody {
            name: &customer.name,
            email: &customer.email,
            phone: &customer.phone,
        };
        self.send(self.http.post(self.url("/customers")).json(&body))
            .await
    }
}
