use crate::config::GatewayConfig;
use crate::domain::card::CardInstrument;
use crate::domain::gateway::{CardToken, ChargeRequest, GatewayTransaction};
use crate::domain::ports::PaymentGateway;
use crate::error::{CheckoutError, Result};
use crate::infrastructure::signature::integrity_signature;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// HTTP adapter for the payment gateway.
///
/// Tokenization authenticates with the public key, charge operations with the
/// private key. Every successful response arrives wrapped in a `data`
/// envelope; error payloads carry `error.reason` and/or a per-field
/// `error.messages` map, both of which are folded into the `Gateway` error
/// the caller sees.
pub struct HttpPaymentGateway {
    http: Client,
    base_url: String,
    public_key: String,
    private_key: String,
    integrity_secret: String,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct MerchantData {
    presigned_acceptance: PresignedAcceptance,
}

#[derive(Deserialize)]
struct PresignedAcceptance {
    acceptance_token: String,
}

#[derive(Serialize)]
struct TokenizeBody<'a> {
    number: &'a str,
    cvc: &'a str,
    exp_month: &'a str,
    exp_year: &'a str,
    card_holder: &'a str,
}

#[derive(Serialize)]
struct ChargeBody<'a> {
    amount_in_cents: i64,
    currency: &'a str,
    customer_email: &'a str,
    payment_method: PaymentMethodBody<'a>,
    reference: &'a str,
    acceptance_token: &'a str,
    signature: String,
    customer_data: CustomerDataBody<'a>,
}

#[derive(Serialize)]
struct PaymentMethodBody<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    token: &'a str,
    installments: u32,
}

#[derive(Serialize)]
struct CustomerDataBody<'a> {
    phone_number: &'a str,
    full_name: &'a str,
}

#[derive(Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    messages: Option<BTreeMap<String, Vec<String>>>,
}

/// Folds the gateway's error payload into a single reason string, falling
/// back to the HTTP status when the payload is unparseable.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body)
        && let Some(error) = payload.error
    {
        if let Some(reason) = error.reason {
            return reason;
        }
        if let Some(messages) = error.messages {
            let fields: Vec<String> = messages
                .into_iter()
                .map(|(field, errors)| format!("{field}: {}", errors.join(", ")))
                .collect();
            if !fields.is_empty() {
                return fields.join("; ");
            }
        }
    }
    format!("gateway returned {status}")
}

impl HttpPaymentGateway {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            public_key: config.public_key.clone(),
            private_key: config.private_key.clone(),
            integrity_secret: config.integrity_secret.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| CheckoutError::Gateway(format!("gateway unreachable: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::Gateway(format!("gateway unreachable: {e}")))?;

        if !status.is_success() {
            return Err(CheckoutError::Gateway(error_message(status, &body)));
        }
        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|e| CheckoutError::Gateway(format!("invalid gateway response: {e}")))?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn acceptance_token(&self) -> Result<String> {
        let merchant: MerchantData = self
            .send(
                self.http
                    .get(self.url(&format!("/merchants/{}", self.public_key))),
            )
            .await?;
        Ok(merchant.presigned_acceptance.acceptance_token)
    }

    async fn tokenize_card(&self, card: &CardInstrument) -> Result<CardToken> {
        let body = TokenizeBody {
            number: &card.number,
            cvc: &card.cvc,
            exp_month: &card.exp_month,
            exp_year: &card.exp_year,
            card_holder: &card.holder,
        };
        self.send(
            self.http
                .post(self.url("/tokens/cards"))
                .bearer_auth(&self.public_key)
                .json(&body),
        )
        .await
    }

    async fn create_charge(&self, charge: &ChargeRequest) -> Result<GatewayTransaction> {
        let amount_in_cents = charge.amount.in_minor_units();
        let body = ChargeBody {
            amount_in_cents,
            currency: &charge.currency,
            customer_email: &charge.customer_email,
            payment_method: PaymentMethodBody {
                kind: "CARD",
                token: &charge.card_token,
                installments: charge.installments,
            },
            reference: &charge.reference,
            acceptance_token: &charge.acceptance_token,
            signature: integrity_signature(
                &charge.reference,
                amount_in_cents,
                &charge.currency,
                &self.integrity_secret,
            ),
            customer_data: CustomerDataBody {
                phone_number: &charge.customer_phone,
                full_name: &charge.customer_name,
            },
        };
        self.send(
            self.http
                .post(self.url("/transactions"))
                .bearer_auth(&self.private_key)
                .json(&body),
        )
        .await
    }

    async fn charge_status(&self, id: &str) -> Result<GatewayTransaction> {
        self.send(
            self.http
                .get(self.url(&format!("/transactions/{id}")))
                .bearer_auth(&self.private_key),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_error_message_prefers_reason() {
        let body = r#"{"error":{"reason":"Invalid card number"}}"#;
        assert_eq!(
            error_message(StatusCode::UNPROCESSABLE_ENTITY, body),
            "Invalid card number"
        );
    }

    #[test]
    fn test_error_message_flattens_field_messages() {
        let body = r#"{"error":{"messages":{"number":["is too short"],"cvc":["is required","must be numeric"]}}}"#;
        assert_eq!(
            error_message(StatusCode::UNPROCESSABLE_ENTITY, body),
            "cvc: is required, must be numeric; number: is too short"
        );
    }

    #[test]
    fn test_error_message_falls_back_on_unparseable_payload() {
        let message = error_message(StatusCode::BAD_GATEWAY, "<html>boom</html>");
        assert!(message.contains("502"));
    }

    #[test]
    fn test_charge_body_shape() {
        let body = ChargeBody {
            amount_in_cents: 10000,
            currency: "COP",
            customer_email: "demo@example.com",
            payment_method: PaymentMethodBody {
                kind: "CARD",
                token: "tok_1",
                installments: 1,
            },
            reference: "TX_tx_1_1",
            acceptance_token: "acc_1",
            signature: "sig".to_string(),
            customer_data: CustomerDataBody {
                phone_number: "+573001234567",
                full_name: "Demo Customer",
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["payment_method"]["type"], "CARD");
        assert_eq!(json["payment_method"]["installments"], 1);
        assert_eq!(json["amount_in_cents"], 10000);
        assert_eq!(json["customer_data"]["full_name"], "Demo Customer");
    }
}
