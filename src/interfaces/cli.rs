use crate::domain::card::CardInstrument;
use crate::domain::catalog::{Delivery, Product};
use crate::domain::money::{FeeBreakdown, format_minor_units};
use crate::domain::transaction::Transaction;
use clap::{Args, Parser, Subcommand};
use std::fmt::Write;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the product catalog
    Products,
    /// Create a pending transaction for a product
    Buy { product_id: String },
    /// Confirm payment for a pending transaction
    Pay {
        transaction_id: String,
        #[command(flatten)]
        card: CardArgs,
    },
    /// List transactions, by default for the configured customer
    Transactions {
        #[arg(long)]
        customer_id: Option<String>,
    },
    /// Show a delivery record
    Delivery { delivery_id: String },
    /// Register the configured customer profile with the backend
    Register,
    /// Run a full checkout against simulated services; needs no
    /// configuration or network
    Demo {
        #[command(flatten)]
        card: CardArgs,
    },
}

#[derive(Args)]
pub struct CardArgs {
    /// Card number; spaces allowed
    #[arg(long, default_value = "4242 4242 4242 4242")]
    pub number: String,
    /// Security code
    #[arg(long, default_value = "123")]
    pub cvc: String,
    /// Expiry month (MM)
    #[arg(long, default_value = "12")]
    pub exp_month: String,
    /// Expiry year (YY or YYYY)
    #[arg(long, default_value = "29")]
    pub exp_year: String,
    /// Card holder name
    #[arg(long, default_value = "Demo Customer")]
    pub holder: String,
}

impl CardArgs {
    pub fn into_instrument(self) -> CardInstrument {
        CardInstrument {
            number: self.number,
            cvc: self.cvc,
            exp_month: self.exp_month,
            exp_year: self.exp_year,
            holder: self.holder,
        }
    }
}

pub fn render_products(products: &[Product]) -> String {
    if products.is_empty() {
        return "catalog is empty\n".to_string();
    }
    let mut out = String::new();
    for product in products {
        let _ = writeln!(
            out,
            "{}  {}  {}  ({} in stock)",
            product.id,
            product.name,
            format_minor_units(product.price),
            product.stock
        );
    }
    out
}

pub fn render_transaction(tx: &Transaction) -> String {
    format!(
        "transaction {}  {}  {}  product {}",
        tx.id,
        tx.status,
        format_minor_units(tx.amount),
        tx.product_id
    )
}

pub fn render_fees(fees: &FeeBreakdown) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "product   {:>12}", format_minor_units(fees.amount));
    let _ = writeln!(out, "fee (2%)  {:>12}", format_minor_units(fees.fee));
    let _ = writeln!(out, "shipping  {:>12}", format_minor_units(fees.shipping));
    let _ = writeln!(out, "total     {:>12}", format_minor_units(fees.total()));
    out
}

pub fn render_delivery(delivery: &Delivery) -> String {
    format!(
        "delivery {}  {}  product {}",
        delivery.id, delivery.status, delivery.product_id
    )
}
