//! Subscription service binary.
//!
//! Loads configuration, connects to PostgreSQL, wires the adapters and
//! serves the HTTP API until SIGINT/SIGTERM.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use subscription_service::adapters::auth::{OidcConfig, OidcSessionValidator};
use subscription_service::adapters::http::{api_router, with_http_layers, AppState};
use subscription_service::adapters::postgres::{
    PostgresProfileRepository, PostgresSubscriptionLedger, PostgresUserDirectory,
};
use subscription_service::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use subscription_service::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        stripe_test_mode = config.payment.is_test_mode(),
        require_livemode = config.payment.require_livemode,
        "Starting subscription service"
    );

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let mut stripe = StripeConfig::new(
        &config.payment.stripe_api_key,
        &config.payment.stripe_webhook_secret,
    );
    if let Some(url) = &config.payment.stripe_api_base_url {
        stripe = stripe.with_base_url(url);
    }

    let oidc = OidcConfig::new(&config.auth.issuer_url, &config.auth.audience)
        .with_cache_duration(config.auth.jwks_cache_ttl());

    let state = AppState {
        ledger: Arc::new(PostgresSubscriptionLedger::new(pool.clone())),
        directory: Arc::new(PostgresUserDirectory::new(pool.clone())),
        profiles: Arc::new(PostgresProfileRepository::new(pool)),
        webhook_verifier: stripe.webhook_verifier(),
        payment_provider: Arc::new(StripePaymentAdapter::new(stripe)),
        session_validator: Arc::new(OidcSessionValidator::new(oidc)?),
        base_url: config.server.base_url.clone(),
        require_livemode: config.payment.require_livemode,
    };

    let app = with_http_layers(api_router(state), &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down");
    Ok(())
}

/// JSON logs in production, human-readable output elsewhere.
///
/// `RUST_LOG` overrides the configured filter when set.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if server.is_production() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .flatten_event(true),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().pretty().with_target(true))
            .init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
