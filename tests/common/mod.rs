use serde_json::{Value, json};
use shopfront::application::engine::CheckoutEngine;
use shopfront::config::{BackendConfig, GatewayConfig, PaymentConfig};
use shopfront::domain::card::CardInstrument;
use shopfront::domain::catalog::CustomerProfile;
use shopfront::infrastructure::http_backend::HttpCommerceBackend;
use shopfront::infrastructure::http_gateway::HttpPaymentGateway;

pub const API_KEY: &str = "test-key";
pub const PUBLIC_KEY: &str = "pub_test";
pub const PRIVATE_KEY: &str = "prv_test";

pub fn demo_customer() -> CustomerProfile {
    CustomerProfile {
        id: "cus_1".to_string(),
        name: "Demo Customer".to_string(),
        email: "demo@example.com".to_string(),
        phone: "+573001234567".to_string(),
    }
}

pub fn card() -> CardInstrument {
    CardInstrument {
        number: "4242 4242 4242 4242".to_string(),
        cvc: "123".to_string(),
        exp_month: "12".to_string(),
        exp_year: "29".to_string(),
        holder: "Demo Customer".to_string(),
    }
}

/// An engine wired to real HTTP adapters pointing at mock servers.
pub fn engine_for(backend_url: String, gateway_url: String) -> CheckoutEngine {
    let backend = HttpCommerceBackend::new(&BackendConfig {
        base_url: backend_url,
        api_key: API_KEY.to_string(),
    });
    let gateway = HttpPaymentGateway::new(&GatewayConfig {
        base_url: gateway_url,
        public_key: PUBLIC_KEY.to_string(),
        private_key: PRIVATE_KEY.to_string(),
        integrity_secret: "test_integrity_secret".to_string(),
    });
    CheckoutEngine::new(
        Box::new(backend),
        Box::new(gateway),
        PaymentConfig::default(),
        demo_customer(),
    )
}

pub fn backend_transaction_json(status: &str) -> Value {
    json!({
        "id": "tx_1",
        "product_id": "prd_1",
        "customer_id": "cus_1",
        "amount": 10000,
        "status": status,
        "created_at": "2026-08-06T12:00:00Z"
    })
}

pub fn gateway_charge_json(status: &str, message: Option<&str>) -> Value {
    json!({
        "data": {
            "id": "chg_1",
            "amount_in_cents": 10000,
            "reference": "TX_tx_1_1",
            "currency": "COP",
            "status": status,
            "status_message": message
        }
    })
}

pub fn acceptance_json() -> Value {
    json!({
        "data": {
            "presigned_acceptance": {
                "acceptance_token": "acc_1",
                "permalink": "https://gateway.test/terms",
                "type": "END_USER_POLICY"
            }
        }
    })
}

pub fn card_token_json() -> Value {
    json!({
        "status": "CREATED",
        "data": {
            "id": "tok_1",
            "brand": "VISA",
            "last_four": "4242",
            "exp_month": "12",
            "exp_year": "29",
            "card_holder": "Demo Customer"
        }
    })
}
