//! Application startup and lifecycle management.

use crate::config::DataroomConfig;
use crate::db;
use crate::handlers;
use crate::services::{
    Database, DriveClient, GoogleOAuthClient, LocalStorage, OAuthStateStore, Storage, TokenManager,
};
use axum::{
    http::{header, HeaderValue, Method, Request},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics::metrics_middleware, tracing::request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: DataroomConfig,
    pub db: Database,
    pub storage: Arc<dyn Storage>,
    pub oauth: GoogleOAuthClient,
    pub oauth_states: OAuthStateStore,
    pub tokens: TokenManager,
    pub drive: DriveClient,
}

impl AppState {
    /// Wire the services together from an open database and a storage backend.
    pub fn new(config: DataroomConfig, db: Database, storage: Arc<dyn Storage>) -> Self {
        let http = reqwest::Client::new();
        let oauth = GoogleOAuthClient::new(http.clone(), config.google.clone());
        let tokens = TokenManager::new(db.clone(), oauth.clone());
        let drive = DriveClient::new(http, config.google.drive_api_url.clone());

        Self {
            config,
            db,
            storage,
            oauth,
            oauth_states: OAuthStateStore::default(),
            tokens,
            drive,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/auth/status", get(handlers::auth_status))
        .route("/auth/login", get(handlers::auth_login))
        .route("/auth/callback", get(handlers::auth_callback))
        .route("/auth/logout", post(handlers::auth_logout))
        .route("/drive/files", get(handlers::list_drive_files))
        .route("/drive/import", post(handlers::import_file))
        .route("/files", get(handlers::list_files))
        .route("/files/search", get(handlers::search_files))
        .route(
            "/files/:id",
            get(handlers::get_file).delete(handlers::delete_file),
        );

    let cors = cors_layer(&state.config.frontend_url);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .nest("/api", api)
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(cors)
}

/// CORS for the single frontend origin, with credentials.
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    match frontend_url.trim_end_matches('/').parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            tracing::error!("Invalid FRONTEND_URL '{}' for CORS: {}", frontend_url, e);
            layer
        }
    }
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    ///
    /// Opens (and migrates) the database, prepares the upload directory and
    /// binds the listener. Port 0 picks a random port.
    pub async fn build(config: DataroomConfig) -> Result<Self, AppError> {
        let pool = db::create_pool(&config.database).await.map_err(|e| {
            tracing::error!("Failed to connect to SQLite: {}", e);
            AppError::from(e)
        })?;
        db::run_migrations(&pool).await.map_err(|e| {
            tracing::error!("Failed to run database migrations: {}", e);
            AppError::from(e)
        })?;

        let storage: Arc<dyn Storage> = Arc::new(
            LocalStorage::new(&config.storage.upload_dir)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to initialize local storage at {}: {}",
                        config.storage.upload_dir,
                        e
                    );
                    e
                })?,
        );

        let state = AppState::new(config.clone(), Database::new(pool), storage);
        if !state.oauth.is_configured() {
            tracing::warn!("Google OAuth credentials not configured - Drive features will fail");
        }

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Data room service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &Database {
        &self.state.db
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router).await
    }

    /// Run until `shutdown` resolves, then drain in-flight requests.
    pub async fn run_with_graceful_shutdown<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = build_router(self.state);
        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
