use anyhow::Context;
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod auth;
mod config;
mod dto;
mod error;
mod handlers;
mod models;
mod services;
mod store;

use config::Config;
use services::events::EventDispatcher;
use services::notifications::NotificationStore;
use store::memory::{InMemoryUserDirectory, InMemoryWorkLogStore};
use store::{seed, UserDirectory, WorkLogStore};

const LIVE_FEED_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WorkLogStore>,
    pub users: Arc<dyn UserDirectory>,
    pub notifications: NotificationStore,
    pub events: EventDispatcher,
    pub config: Arc<Config>,
    pub ws_tx: Option<broadcast::Sender<String>>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn WorkLogStore>,
        users: Arc<dyn UserDirectory>,
        ws_tx: Option<broadcast::Sender<String>>,
    ) -> Self {
        let notifications = NotificationStore::new();
        let events = EventDispatcher::new(users.clone(), notifications.clone(), ws_tx.clone());
        Self {
            store,
            users,
            notifications,
            events,
            config,
            ws_tx,
        }
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = std::iter::once(&config.frontend_url)
        .chain(config.cors_extra_origins.iter())
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(auth::middleware::USER_ID_HEADER),
            HeaderName::from_static(handlers::reminders::ADMIN_TOKEN_HEADER),
        ])
        .expose_headers([header::CONTENT_DISPOSITION])
        .allow_credentials(true)
}

pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route("/api/users", get(handlers::users::list_users))
        .route(
            "/api/admin/reminders/run",
            post(handlers::reminders::run_reminders),
        )
        .route("/ws", get(handlers::ws::ws_handler));

    let protected_routes = Router::new()
        .route("/api/me", get(handlers::users::me))
        // Work logs
        .route(
            "/api/work-logs",
            get(handlers::work_logs::list_logs).post(handlers::work_logs::create_log),
        )
        .route(
            "/api/work-logs/grouped",
            get(handlers::work_logs::list_grouped),
        )
        .route(
            "/api/work-logs/:id",
            get(handlers::work_logs::get_log)
                .put(handlers::work_logs::update_log)
                .delete(handlers::work_logs::delete_log),
        )
        .route(
            "/api/work-logs/:id/review",
            post(handlers::work_logs::review_log),
        )
        .route(
            "/api/work-logs/:id/export",
            get(handlers::work_logs::export_log),
        )
        // Reports & statistics
        .route("/api/reports/summary", get(handlers::reports::summary))
        .route("/api/reports/export", get(handlers::reports::export))
        .route("/api/dashboard", get(handlers::dashboard::get_dashboard))
        .route("/api/team/rollup", get(handlers::team::rollup))
        .route(
            "/api/charts/productivity",
            get(handlers::charts::productivity),
        )
        .route("/api/charts/team", get(handlers::charts::team))
        // Notifications
        .route(
            "/api/notifications",
            get(handlers::notifications::list_notifications),
        )
        .route(
            "/api/notifications/:id/read",
            post(handlers::notifications::mark_read),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_user,
        ));

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "worklog_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env().context("Invalid configuration")?);

    let logs = if config.seed_demo_data {
        seed::demo_logs(handlers::today())
    } else {
        Vec::new()
    };
    tracing::info!(logs = logs.len(), latency_ms = config.store_latency_ms, "Work log store ready");

    let store: Arc<dyn WorkLogStore> = Arc::new(InMemoryWorkLogStore::with_logs(
        logs,
        Duration::from_millis(config.store_latency_ms),
    ));
    let users: Arc<dyn UserDirectory> = Arc::new(InMemoryUserDirectory::new(seed::demo_users()));

    // Live event feed
    let (ws_tx, _) = broadcast::channel::<String>(LIVE_FEED_CAPACITY);

    let state = AppState::new(config.clone(), store, users, Some(ws_tx));

    if let Some(hour) = config.reminder_hour_utc {
        tracing::info!(hour_utc = hour, "Starting daily reminder worker");
        handlers::reminders::spawn_reminder_worker(state.clone(), hour);
    }

    let app = build_router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
