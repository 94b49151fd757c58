use crate::domain::catalog::CustomerProfile;
use crate::error::{CheckoutError, Result};
use std::env;

/// Connection settings for the commerce backend REST API.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub api_key: String,
}

/// Connection settings for the payment gateway. The public key authorizes
/// tokenization, the private key authorizes charge operations, and the
/// integrity secret feeds the charge signature.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub public_key: String,
    pub private_key: String,
    pub integrity_secret: String,
}

/// Charge parameters that do not vary per checkout.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub currency: String,
    pub installments: u32,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            currency: "COP".to_string(),
            installments: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub gateway: GatewayConfig,
    pub payment: PaymentConfig,
    pub customer: CustomerProfile,
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| CheckoutError::Config(format!("{name} is not set")))
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    /// Reads the full configuration from the environment. Connection
    /// endpoints and keys are required; the demo buyer profile and payment
    /// parameters fall back to defaults.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            backend: BackendConfig {
                base_url: required("SHOPFRONT_API_BASE_URL")?,
                api_key: required("SHOPFRONT_API_KEY")?,
            },
            gateway: GatewayConfig {
                base_url: required("SHOPFRONT_GATEWAY_BASE_URL")?,
                public_key: required("SHOPFRONT_GATEWAY_PUBLIC_KEY")?,
                private_key: required("SHOPFRONT_GATEWAY_PRIVATE_KEY")?,
                integrity_secret: required("SHOPFRONT_GATEWAY_INTEGRITY_SECRET")?,
            },
            payment: PaymentConfig {
                currency: var_or("SHOPFRONT_CURRENCY", "COP"),
                installments: 1,
            },
            customer: CustomerProfile {
                id: var_or(
                    "SHOPFRONT_CUSTOMER_ID",
                    "8690975e-02f5-42cc-9df1-b3f66febb094",
                ),
                name: var_or("SHOPFRONT_CUSTOMER_NAME", "Demo Customer"),
                email: var_or("SHOPFRONT_CUSTOMER_EMAIL", "demo@example.com"),
                phone: var_or("SHOPFRONT_CUSTOMER_PHONE", "+573001234567"),
            },
        })
    }
}
