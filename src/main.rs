use clap::Parser;
use miette::{IntoDiagnostic, Result, miette};
use shopfront::application::engine::CheckoutEngine;
use shopfront::application::session::CheckoutSession;
use shopfront::config::{AppConfig, PaymentConfig};
use shopfront::domain::catalog::{CustomerProfile, Product};
use shopfront::infrastructure::http_backend::HttpCommerceBackend;
use shopfront::infrastructure::http_gateway::HttpPaymentGateway;
use shopfront::infrastructure::in_memory::{InMemoryBackend, SimulatedGateway};
use shopfront::interfaces::cli;
use shopfront::interfaces::cli::{CardArgs, Cli, Command};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Cli::parse();

    // The demo runs entirely against simulated services; everything else
    // talks to the configured backend and gateway.
    let engine = match &args.command {
        Command::Demo { .. } => demo_engine(),
        _ => {
            let config = AppConfig::from_env().into_diagnostic()?;
            CheckoutEngine::new(
                Box::new(HttpCommerceBackend::new(&config.backend)),
                Box::new(HttpPaymentGateway::new(&config.gateway)),
                config.payment,
                config.customer,
            )
        }
    };

    dispatch(&engine, args.command).await
}

async fn dispatch(engine: &CheckoutEngine, command: Command) -> Result<()> {
    match command {
        Command::Products => {
            let products = engine.products().await.into_diagnostic()?;
            print!("{}", cli::render_products(&products));
        }
        Command::Buy { product_id } => {
            let tx = engine.start_checkout(&product_id).await.into_diagnostic()?;
            let session = CheckoutSession::begin(tx);
            println!("{}", cli::render_transaction(session.transaction()));
            print!("{}", cli::render_fees(session.fees()));
        }
        Command::Pay {
            transaction_id,
            card,
        } => {
            confirm_and_fulfill(engine, &transaction_id, card).await?;
        }
        Command::Transactions { customer_id } => {
            let transactions = engine
                .transactions(customer_id.as_deref())
                .await
                .into_diagnostic()?;
            for tx in &transactions {
                println!("{}", cli::render_transaction(tx));
            }
        }
        Command::Delivery { delivery_id } => {
            let delivery = engine.delivery(&delivery_id).await.into_diagnostic()?;
            println!("{}", cli::render_delivery(&delivery));
        }
        Command::Register => {
            let customer = engine.register_customer().await.into_diagnostic()?;
            println!("registered customer {} <{}>", customer.name, customer.email);
        }
        Command::Demo { card } => {
            let products = engine.products().await.into_diagnostic()?;
            print!("{}", cli::render_products(&products));
            let first = products.first().ok_or_else(|| miette!("catalog is empty"))?;

            let tx = engine.start_checkout(&first.id).await.into_diagnostic()?;
            println!("{}", cli::render_transaction(&tx));
            confirm_and_fulfill(engine, &tx.id, card).await?;
        }
    }
    Ok(())
}

/// The interactive half of a checkout: enter the card into the session,
/// confirm, report the outcome and trigger fulfillment when it completed.
async fn confirm_and_fulfill(
    engine: &CheckoutEngine,
    transaction_id: &str,
    card: CardArgs,
) -> Result<()> {
    let tx = engine.transaction(transaction_id).await.into_diagnostic()?;
    let mut session = CheckoutSession::begin(tx);
    session.enter_card(card.into_instrument());
    print!("{}", cli::render_fees(session.fees()));

    let updated = engine
        .confirm(transaction_id, session.card())
        .await
        .into_diagnostic()?;
    session.apply(updated);
    println!("{}", cli::render_transaction(session.transaction()));

    if let Some(delivery) = engine.fulfill(session.transaction()).await {
        println!("{}", cli::render_delivery(&delivery));
    }
    Ok(())
}

fn demo_engine() -> CheckoutEngine {
    let backend = InMemoryBackend::with_products(vec![
        Product {
            id: "prd_1".to_string(),
            name: "Mechanical Keyboard".to_string(),
            price: 10000,
            stock: 12,
        },
        Product {
            id: "prd_2".to_string(),
            name: "USB-C Dock".to_string(),
            price: 25500,
            stock: 4,
        },
    ]);
    CheckoutEngine::new(
        Box::new(backend),
        Box::new(SimulatedGateway::approving()),
        PaymentConfig::default(),
        CustomerProfile {
            id: "8690975e-02f5-42cc-9df1-b3f66febb094".to_string(),
            name: "Demo Customer".to_string(),
            email: "demo@example.com".to_string(),
            phone: "+573001234567".to_string(),
        },
    )
}
