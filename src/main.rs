use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use wheeliewash::config::AppConfig;
use wheeliewash::db;
use wheeliewash::handlers;
use wheeliewash::services::council::chrome::HeadlessChromeCalendar;
use wheeliewash::services::notify::resend::ResendEmailProvider;
use wheeliewash::services::worker;
use wheeliewash::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let council = HeadlessChromeCalendar::new(
        config.council_calendar_url.clone(),
        Duration::from_secs(config.scrape_timeout_secs),
    );
    let notifier = ResendEmailProvider::new(
        config.resend_api_key.clone(),
        config.notify_email_from.clone(),
        config.notify_email_to.clone(),
    );

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        council: Box::new(council),
        notifier: Box::new(notifier),
    });

    let worker_handle = tokio::spawn(worker::run(Arc::clone(&state)));

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/bookings", post(handlers::bookings::create_booking))
        .route(
            "/api/bookings/:id",
            get(handlers::bookings::get_booking_status),
        )
        .route("/api/admin/bookings", get(handlers::bookings::get_bookings))
        .route(
            "/api/admin/status",
            get(handlers::bookings::get_queue_status),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Either side going down takes the process with it; a supervisor
    // restart is the recovery path.
    tokio::select! {
        result = axum::serve(listener, app) => result?,
        result = worker_handle => result??,
    }

    Ok(())
}
