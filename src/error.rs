use thiserror::Error;

pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Failure taxonomy for a single checkout attempt.
///
/// No variant is fatal to the process; each one is scoped to the attempt that
/// produced it and reported back to the caller.
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// Missing or malformed user input, recoverable by correcting the input.
    #[error("validation error: {0}")]
    Validation(String),
    /// The commerce backend was unreachable or answered with a non-2xx status.
    #[error("backend error: {0}")]
    Upstream(String),
    /// The payment gateway rejected a tokenization or charge. Carries the
    /// gateway's own reason string when its error payload was parseable.
    #[error("gateway error: {0}")]
    Gateway(String),
    /// Required configuration is missing from the environment.
    #[error("configuration error: {0}")]
    Config(String),
}
