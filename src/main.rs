//! Coachbill server binary.
//!
//! Wires the PostgreSQL adapters into the billing HTTP surface and
//! serves it with axum.

use std::sync::Arc;

use axum::{routing::get, Router};
use http::{HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, EnvFilter};

use coachbill::adapters::http::{billing_routes, BillingAppState};
use coachbill::adapters::postgres::{
    PostgresBillingReader, PostgresClientDirectory, PostgresPaymentRepository,
    PostgresPlanRepository, PostgresSubscriptionRepository,
};
use coachbill::config::AppConfig;

async fn health() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    let filter = EnvFilter::new(&config.server.log_level);
    if config.is_production() {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt().with_env_filter(filter).init();
    }

    let pool = config.database.create_pool().await?;
    tracing::info!("Database pool established");

    if config.database.run_migrations {
        sqlx::migrate!().run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let state = BillingAppState {
        plan_repository: Arc::new(PostgresPlanRepository::new(pool.clone())),
        subscription_repository: Arc::new(PostgresSubscriptionRepository::new(pool.clone())),
        payment_repository: Arc::new(PostgresPaymentRepository::new(pool.clone())),
        billing_reader: Arc::new(PostgresBillingReader::new(pool.clone())),
        client_directory: Arc::new(PostgresClientDirectory::new(pool.clone())),
    };

    let origins = config
        .server
        .allowed_origins()
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(tower_http::cors::Any)
        .allow_origin(origins);

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", billing_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors);

    let addr = config.server.bind_addr()?;
    tracing::info!(%addr, "Listening for incoming connections");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
