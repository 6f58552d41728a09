//! Bazaar storefront - grocery catalog and recipe bundle API.
//!
//! Loads the fixture catalog, then serves the JSON API, the admin gate and
//! the demo session controls on `STOREFRONT_HOST:STOREFRONT_PORT`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::borrow::Cow;

use bazaar_storefront::config::{ConfigError, StorefrontConfig};
use bazaar_storefront::fixtures::{FixtureError, Fixtures};
use bazaar_storefront::routes;
use bazaar_storefront::services::Catalog;
use bazaar_storefront::state::AppState;
use sentry::integrations::tracing::{self as sentry_tracing, EventFilter};
use thiserror::Error;
use tracing::{Level, Metadata, error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "bazaar_storefront=info,tower_http=debug";

/// Reasons the storefront can fail to come up.
#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("fixtures: {0}")]
    Fixtures(#[from] FixtureError),
    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

/// Start Sentry when a DSN is configured. The guard flushes events on drop.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let options = sentry::ClientOptions {
        release: sentry::release_name!(),
        environment: config.sentry_environment.clone().map(Cow::Owned),
        attach_stacktrace: true,
        ..Default::default()
    };
    config
        .sentry_dsn
        .as_deref()
        .map(|dsn| sentry::init((dsn, options)))
}

/// Warnings and errors become Sentry events; info and debug become breadcrumbs.
fn sentry_filter(metadata: &Metadata<'_>) -> EventFilter {
    match *metadata.level() {
        Level::ERROR | Level::WARN => EventFilter::Event,
        Level::INFO | Level::DEBUG => EventFilter::Breadcrumb,
        Level::TRACE => EventFilter::Ignore,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_filter))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = StorefrontConfig::from_env()?;
    let _sentry = init_sentry(&config);
    init_tracing();

    let catalog = Catalog::new(Fixtures::load(config.fixtures_dir.as_deref())?);
    info!(
        products = catalog.products.len(),
        categories = catalog.categories.len(),
        bundles = catalog.bundles.len(),
        "Catalog loaded"
    );

    let addr = config.socket_addr();
    let app = routes::app(AppState::new(config, catalog))
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Storefront listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Storefront stopped");
    Ok(())
}

/// Resolve on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutting down");
}
