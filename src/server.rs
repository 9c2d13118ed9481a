use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::auth::{PasswordHasher, TokenService};
use crate::config::AppConfig;
use crate::database::{DatabaseManager, Store};
use crate::handlers::{protected, public};
use crate::middleware::require_auth;

/// Shared handler dependencies. Cheap to clone; every field is a handle.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenService,
    pub passwords: PasswordHasher,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, tokens: TokenService, passwords: PasswordHasher) -> Self {
        Self {
            store,
            tokens,
            passwords,
        }
    }
}

/// Router-wide layers that depend on configuration.
#[derive(Debug, Clone, Copy)]
pub struct ServerOptions {
    pub enable_cors: bool,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

impl ServerOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            enable_cors: config.security.enable_cors,
            enable_request_logging: config.api.enable_request_logging,
            max_request_size_bytes: config.api.max_request_size_bytes,
        }
    }
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            enable_cors: true,
            enable_request_logging: false,
            max_request_size_bytes: 1024 * 1024,
        }
    }
}

pub fn app(state: AppState) -> Router {
    app_with_options(state, ServerOptions::default())
}

pub fn app_with_options(state: AppState, options: ServerOptions) -> Router {
    let mut router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .layer(DefaultBodyLimit::max(options.max_request_size_bytes))
        .with_state(state);

    if options.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if options.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(public::users::register))
        .route("/api/auth", post(public::auth::login))
        .route("/api/profile", get(public::profile::list_profiles))
        .route("/api/profile/user/:id", get(public::profile::profile_by_user))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/users", delete(protected::users::delete_account))
        .route("/api/auth", get(protected::auth::current_user))
        .route("/api/profile", post(protected::profile::upsert_profile))
        .route("/api/profile/me", get(protected::profile::own_profile))
        .route(
            "/api/tweets",
            get(protected::tweets::list_tweets).post(protected::tweets::create_tweet),
        )
        .route("/api/tweets/reply/:id", post(protected::tweets::reply_to_tweet))
        .route("/api/tweets/like/:id", put(protected::tweets::like_tweet))
        .route("/api/tweets/unlike/:id", put(protected::tweets::unlike_tweet))
        .route(
            "/api/tweets/:id",
            get(protected::tweets::get_tweet)
                .put(protected::tweets::update_tweet)
                .delete(protected::tweets::delete_tweet),
        )
        // route_layer: unmatched paths stay 404 instead of 401
        .route_layer(from_fn_with_state(state, require_auth))
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "TwitterClone API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "users": "/api/users (POST public, DELETE protected)",
            "auth": "/api/auth (POST public, GET protected)",
            "profile": "/api/profile[/me|/user/:id]",
            "tweets": "/api/tweets[/:id|/reply/:id|/like/:id|/unlike/:id] (protected)",
            "health": "/health"
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(state.store.as_ref()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": state.store.backend()
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "store": state.store.backend()
                })),
            )
        }
    }
}

/// Connects the store, binds the listener and serves until shutdown.
pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let store = DatabaseManager::connect(&config.database)
        .await
        .context("failed to initialise store")?;
    let tokens = TokenService::from_config(&config.security).context("invalid token configuration")?;
    let passwords = PasswordHasher::new(config.security.bcrypt_cost);

    let state = AppState::new(store, tokens, passwords);
    let app = app_with_options(state, ServerOptions::from_config(config));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("TwitterClone API listening on http://{}", bind_addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
