use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::Utc;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use lifelog_core::{export, Database, FullState, SyncBatch, SyncSession, SyncSummary};

use crate::auth::{extract_bearer_token, user_fingerprint, AccessTokenVerifier, AuthenticatedUser};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::rate_limit::{RateLimitSnapshot, SyncEndpoint, SyncRateLimiter};
use crate::rewards::{RewardMetricsSnapshot, TracingRewards};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    db: Arc<tokio::sync::Mutex<Database>>,
    token_verifier: Arc<AccessTokenVerifier>,
    rewards: Arc<TracingRewards>,
    rate_limiter: Arc<SyncRateLimiter>,
}

impl AppState {
    pub fn from_config(config: Arc<AppConfig>) -> lifelog_core::Result<Self> {
        let db = Database::open(&config.database_path)?;
        Ok(Self::with_database(config, db))
    }

    pub fn with_database(config: Arc<AppConfig>, db: Database) -> Self {
        Self {
            db: Arc::new(tokio::sync::Mutex::new(db)),
            token_verifier: Arc::new(AccessTokenVerifier::new(config.clone())),
            rewards: Arc::new(TracingRewards::default()),
            rate_limiter: Arc::new(SyncRateLimiter::from_config(config.as_ref())),
            config,
        }
    }
}

pub fn app_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/sync", post(sync_upload))
        .route("/sync/download", post(sync_download))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/healthz", get(healthz))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: i64,
    rate_limit: RateLimitSnapshot,
    rewards: RewardMetricsSnapshot,
}

async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().timestamp(),
        rate_limit: state.rate_limiter.snapshot(),
        rewards: state.rewards.metrics_snapshot(),
    })
}

async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers())?;
    let user = state.token_verifier.verify_access_token(token)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

async fn sync_upload(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(batch): Json<SyncBatch>,
) -> Result<Json<SyncSummary>, AppError> {
    state
        .rate_limiter
        .check(SyncEndpoint::Upload, &user.user_id)
        .await?;

    let user_hash = user_fingerprint(&user.user_id);
    let total_items = batch.total_items();
    let db = state.db.lock().await;
    let summary = SyncSession::new(db.connection(), &user.user_id, state.rewards.as_ref())
        .with_commit_mode(state.config.commit_mode)
        .run(batch)?;

    tracing::info!(
        endpoint = "sync_upload",
        user = user_hash,
        total_items,
        conflicts_resolved = summary.conflicts_resolved,
        "Processed sync batch"
    );
    Ok(Json(summary))
}

async fn sync_download(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<FullState>, AppError> {
    state
        .rate_limiter
        .check(SyncEndpoint::Download, &user.user_id)
        .await?;

    let user_hash = user_fingerprint(&user.user_id);
    let db = state.db.lock().await;
    let state_snapshot = export(db.connection(), &user.user_id)?;

    tracing::info!(
        endpoint = "sync_download",
        user = user_hash,
        total_records = state_snapshot.total_records(),
        "Exported full state"
    );
    Ok(Json(state_snapshot))
}
