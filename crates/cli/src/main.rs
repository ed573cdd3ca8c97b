//! Shopfront CLI - drive a persistent cart and the checkout wizard.
//!
//! # Usage
//!
//! ```bash
//! # Add two shirts and look at the cart
//! sf-cli cart add shirt-001 "Shirt" 20 --quantity 2
//! sf-cli cart show
//!
//! # Preview a promo code
//! sf-cli cart promo WELCOME10
//!
//! # Run the full checkout with details from a file
//! sf-cli checkout --details order.json --promo WELCOME10
//! ```
//!
//! # Commands
//!
//! - `cart` - Add, remove, update, save and restore cart lines
//! - `checkout` - Run shipping, payment and review, then place the order
//! - `promos` - List available promo codes
//!
//! Cart state lives under `STOREFRONT_DATA_DIR` (default `.shopfront`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use shopfront_core::Price;
use shopfront_storefront::StorefrontError;
use shopfront_storefront::config::{LogFormat, StorefrontConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "sf-cli")]
#[command(author, version, about = "Shopfront cart and checkout")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Check out the current cart
    Checkout {
        /// JSON file with `shipping` and `payment` sections
        #[arg(short, long)]
        details: PathBuf,

        /// Promo code to apply before checking out
        #[arg(short, long)]
        promo: Option<String>,

        /// Override the simulated submission latency in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// List promo codes
    Promos,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product (merges with an existing line)
    Add {
        /// Product ID
        id: String,

        /// Product title
        title: String,

        /// Unit price, e.g. `20` or `$19.99`
        price: Price,

        /// Quantity to add (1-10)
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a line
    Remove {
        /// Product ID
        id: String,
    },
    /// Set a line's quantity (clamped to 1-10)
    Set {
        /// Product ID
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Show the cart and its totals
    Show,
    /// Show the totals with a promo code applied
    Promo {
        /// Promo code (case-insensitive)
        code: String,
    },
    /// Move a line to saved-for-later
    Save {
        /// Product ID
        id: String,
    },
    /// Move a saved item back into the cart
    Restore {
        /// Product ID
        id: String,
    },
    /// Empty the cart (saved items are kept)
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(std::borrow::Cow::Owned(config.sentry_environment.clone())),
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(format: LogFormat) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_storefront=info,shopfront_cli=info".into());

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter));

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt().with_writer(std::io::stderr).init();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing(config.log_format);

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    dispatch(cli, &config)
        .await
        .inspect_err(StorefrontError::report)?;
    Ok(())
}

async fn dispatch(cli: Cli, config: &StorefrontConfig) -> shopfront_storefront::Result<()> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Add {
                id,
                title,
                price,
                quantity,
            } => commands::cart::add(config, &id, &title, price, quantity)?,
            CartAction::Remove { id } => commands::cart::remove(config, &id),
            CartAction::Set { id, quantity } => commands::cart::set(config, &id, quantity)?,
            CartAction::Show => commands::cart::show(config),
            CartAction::Promo { code } => commands::cart::promo(config, &code)?,
            CartAction::Save { id } => commands::cart::save(config, &id)?,
            CartAction::Restore { id } => commands::cart::restore(config, &id)?,
            CartAction::Clear => commands::cart::clear(config),
        },
        Commands::Checkout {
            details,
            promo,
            delay_ms,
        } => {
            commands::checkout::run(config, &details, promo.as_deref(), delay_ms).await?;
        }
        Commands::Promos => render::promos(),
    }
    Ok(())
}
