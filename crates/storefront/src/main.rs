//! Shop Storefront - Terminal storefront client.
//!
//! # Usage
//!
//! ```bash
//! # Against the default backend (http://localhost:8080/api/v1, cart 1)
//! shop-storefront
//!
//! # Against another backend and cart
//! shop-storefront --api-base-url http://shop.internal:8080/api/v1 --cart-id 7
//! ```
//!
//! Flags override the `SHOP_*` environment variables (see `config`).
//! Diagnostics go to stderr, controlled by `RUST_LOG`, so they never
//! interleave with the rendered views on stdout.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use sentry::integrations::tracing as sentry_tracing;
use shop_core::CartId;
use shop_storefront::config::{ShopConfig, parse_base_url};
use shop_storefront::error::{AppError, Result};
use shop_storefront::terminal::{self, Console, ConsoleNotifier};
use shop_storefront::Storefront;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shop-storefront")]
#[command(author, version, about = "Terminal storefront for the shop API")]
struct Cli {
    /// Backend base address, including the version prefix
    #[arg(long)]
    api_base_url: Option<String>,

    /// Cart to work on
    #[arg(long)]
    cart_id: Option<CartId>,

    /// Product page to show
    #[arg(long)]
    page: Option<u32>,

    /// Products per page
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    page_size: Option<u32>,
}

impl Cli {
    /// Apply command-line overrides on top of the environment configuration.
    fn apply(self, mut config: ShopConfig) -> Result<ShopConfig> {
        if let Some(url) = self.api_base_url {
            config.api_base_url = parse_base_url(&url)?;
        }
        if let Some(cart_id) = self.cart_id {
            config.cart_id = cart_id;
        }
        if let Some(page) = self.page {
            config.page = page;
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        Ok(config)
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ShopConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
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

/// Initialize tracing with `EnvFilter`, stderr output and Sentry integration.
fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shop_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration first (needed for Sentry init)
    let config = ShopConfig::from_env()
        .map_err(AppError::from)
        .and_then(|config| cli.apply(config));

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let result = match config {
        Ok(config) => run(config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ShopConfig) -> Result<()> {
    tracing::info!(
        api_base_url = %config.api_base_url,
        cart_id = %config.cart_id,
        "Starting storefront"
    );

    let console = Arc::new(Console::new(
        BufReader::new(tokio::io::stdin()),
        std::io::stdout(),
    ));
    let storefront = Storefront::new(&config, ConsoleNotifier::new(Arc::clone(&console)));

    storefront.refresh().await;
    terminal::run(&storefront, &console).await?;

    tracing::info!("Storefront closed");
    Ok(())
}
