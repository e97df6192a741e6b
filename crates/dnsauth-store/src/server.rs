//! HTTP service: `POST /log`, `GET /stats` and a JSON 404 for everything else.

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
        HeaderMap, Method, StatusCode,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use dnsauth_core::{LogRequest, UsageLogEntry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::store::UsageStore;
use crate::StoreError;

/// Placeholder recorded when the client IP or user agent is not known.
pub const UNKNOWN: &str = "unknown";

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    store: UsageStore,
    admin_token: Option<Arc<str>>,
    recent_limit: u32,
    top_limit: u32,
}

impl AppState {
    /// State for `store` using the limits and token from `config`
    #[must_use]
    pub fn new(store: UsageStore, config: &ServerConfig) -> Self {
        Self {
            store,
            admin_token: config.admin_token().map(Arc::from),
            recent_limit: config.recent_limit,
            top_limit: config.top_limit,
        }
    }
}

/// JSON error body: `{"error": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }

    fn response(status: StatusCode, msg: impl Into<String>) -> Response {
        (status, Json(Self::new(msg))).into_response()
    }
}

#[derive(Debug, Serialize)]
struct LogAccepted {
    success: bool,
}

/// Build the service router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    let stats_routes = Router::new()
        .route("/stats", get(stats).fallback(not_found))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/log", post(log).fallback(not_found))
        .merge(stats_routes)
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the configured database and serve until the listener fails
pub async fn run(config: &ServerConfig) -> crate::Result<()> {
    let store = UsageStore::connect(&config.database_url).await?;
    let app = router(AppState::new(store, config));

    let listener = TcpListener::bind(config.listen)
        .await
        .map_err(|e| StoreError::Server(format!("bind {}: {e}", config.listen)))?;

    info!(
        addr = %config.listen,
        stats_protected = config.admin_token().is_some(),
        "usage log service running"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| StoreError::Server(format!("server error: {e}")))
}

/// POST /log - append one check
async fn log(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<LogRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "rejected log body");
            return ApiError::response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let Some(entry) = UsageLogEntry::from_request(
        &request,
        client_ip(&headers),
        user_agent(&headers),
        Utc::now(),
    ) else {
        return ApiError::response(StatusCode::BAD_REQUEST, "Missing required fields");
    };

    match state.store.append(&entry).await {
        Ok(_) => (StatusCode::OK, Json(LogAccepted { success: true })).into_response(),
        Err(e) => {
            error!(error = %e, domain = %entry.domain, "failed to append usage log");
            ApiError::response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// GET /stats - aggregate usage
async fn stats(State(state): State<AppState>) -> Response {
    match state.store.stats(state.recent_limit, state.top_limit).await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => {
            error!(error = %e, "failed to read usage stats");
            ApiError::response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn not_found() -> Response {
    ApiError::response(StatusCode::NOT_FOUND, "Not found")
}

/// Bearer token gate for `/stats`. Open when no token is configured.
async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(expected) = state.admin_token.as_deref() else {
        return next.run(req).await;
    };

    let presented = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    if presented.is_some_and(|token| token_matches(token, expected)) {
        next.run(req).await
    } else {
        warn!("unauthorized stats request");
        ApiError::response(StatusCode::UNAUTHORIZED, "Unauthorized")
    }
}

/// Compare in constant time for equal lengths.
fn token_matches(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// `CF-Connecting-IP`, else the first `X-Forwarded-For` hop, else `unknown`
fn client_ip(headers: &HeaderMap) -> String {
    header_value(headers, "cf-connecting-ip")
        .or_else(|| {
            header_value(headers, "x-forwarded-for")
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .unwrap_or(UNKNOWN)
        .to_string()
}

fn user_agent(headers: &HeaderMap) -> String {
    header_value(headers, USER_AGENT.as_str())
        .unwrap_or(UNKNOWN)
        .to_string()
}
