//! Navalha Server - Salon Management System
//!
//! A Rust REST API server for salon scheduling and online booking.

use axum::{
    routing::{delete, get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use navalha_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing, optionally with a daily rolling file
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("navalha_server={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer());
    let _appender_guard = match &config.logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "navalha.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    };

    tracing::info!("Starting Navalha Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address and sweep cadence before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;
    let sweep_interval = config.booking.sweep_interval_seconds;

    // Create repository and services
    let repository = Repository::new(pool.clone());
    let services = Services::new(
        repository,
        config.booking.clone(),
        config.payments.clone(),
        config.notifications.clone(),
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
        pool,
    };

    // Background hold sweep. Acquire and availability check expiry live;
    // this keeps the holds table tidy and closes abandoned deposits.
    let sweeper = state.services.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(sweep_interval.max(5)));
        loop {
            ticker.tick().await;
            match sweeper.holds.expire_sweep().await {
                Ok(0) => {}
                Ok(expired) => tracing::info!(expired, "hold sweep expired stale holds"),
                Err(e) => tracing::warn!(error = %e, "hold sweep failed"),
            }
        }
    });

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Rate limiting for the public booking surface
    let governor_config = Box::leak(Box::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(50)
            .finish()
            .expect("valid governor configuration"),
    ));

    // Public online-booking routes (rate limited)
    let booking = Router::new()
        .route("/availability/slots", get(api::availability::free_slots))
        .route("/availability/next", get(api::availability::next_available))
        .route("/holds", post(api::holds::acquire))
        .route("/holds/:id/extend", post(api::holds::extend))
        .route("/holds/:id/confirm", post(api::holds::confirm))
        .route("/holds/:id", delete(api::holds::release))
        .layer(GovernorLayer { config: governor_config });

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Online booking
        .merge(booking)
        // Hold hygiene
        .route("/holds/cleanup", post(api::holds::cleanup))
        // Appointments
        .route("/appointments", get(api::appointments::list))
        .route("/appointments", post(api::appointments::create))
        .route("/appointments/:id", get(api::appointments::get))
        .route("/appointments/:id/confirm", post(api::appointments::confirm))
        .route("/appointments/:id/start", post(api::appointments::start))
        .route("/appointments/:id/complete", post(api::appointments::complete))
        .route("/appointments/:id/no-show", post(api::appointments::no_show))
        .route("/appointments/:id/cancel", post(api::appointments::cancel))
        .route("/appointments/:id/reschedule", post(api::appointments::reschedule))
        // Working hours
        .route("/professionals/:id/working-hours", get(api::working_hours::list))
        .route("/professionals/:id/working-hours", post(api::working_hours::create))
        .route("/working-hours/:id", delete(api::working_hours::delete))
        // Blocks
        .route("/blocks", get(api::blocks::list))
        .route("/blocks", post(api::blocks::create))
        .route("/blocks/:id/approve", post(api::blocks::approve))
        .route("/blocks/:id/reject", post(api::blocks::reject))
        .route("/blocks/:id", delete(api::blocks::delete))
        // Payments
        .route("/payments/webhook", post(api::payments::webhook))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
