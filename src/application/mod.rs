//! Application layer containing the checkout orchestration logic.
//!
//! This module defines the `CheckoutEngine`, which sequences the transaction
//! confirmation flow across the commerce backend and the payment gateway, and
//! the `CheckoutSession` context that carries per-checkout state between
//! steps.

pub mod engine;
pub mod session;
