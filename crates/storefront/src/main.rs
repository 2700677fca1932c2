//! StyleShop Storefront - Public e-commerce API.
//!
//! This binary serves the storefront JSON API on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework
//! - Cosmic headless CMS for products, collections and reviews
//!   (or a local JSON fixture via `STOREFRONT_CONTENT_FIXTURE`)
//! - In-memory sessions, each owning one cart
//! - Simulated checkout; no payment processing

#![cfg_attr(not(test), forbid(unsafe_code))]

use sentry::integrations::tracing as sentry_tracing;
use styleshop_storefront::config::{ContentConfig, LogFormat, StorefrontConfig};
use styleshop_storefront::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Start the Sentry client when a DSN is configured. Dropping the guard flushes it.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
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

/// Warnings and errors become Sentry events; info and debug become breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "styleshop_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with((format == LogFormat::Pretty).then(tracing_subscriber::fmt::layer))
        .with((format == LogFormat::Json).then(|| tracing_subscriber::fmt::layer().json()))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;

    // Sentry first so the tracing layer has a client to report to.
    let _sentry_guard = init_sentry(&config);
    init_tracing(config.log_format);

    match &config.content {
        ContentConfig::Cosmic(cosmic) => {
            tracing::info!(bucket = %cosmic.bucket_slug, "Serving content from Cosmic");
        }
        ContentConfig::Fixture(path) => {
            tracing::warn!(path = %path.display(), "Serving content from local fixture");
        }
    }

    let addr = config.socket_addr();
    let state = AppState::new(config)?;
    let app = styleshop_storefront::app(state);

    tracing::info!("storefront listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler unavailable");
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

    tracing::info!("Shutting down, draining in-flight requests");
}
