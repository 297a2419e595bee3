//! HTTP API for the Roster node.
//!
//! Builds the router, owns the shared state, and maps errors to JSON
//! responses. The user endpoints themselves live in [`crate::users_api`].

use axum::{
    body::Body,
    extract::State,
    http::{header, Method, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use roster_users::{NewUser, UserError, UserRecord, UserStore};
use serde::Serialize;
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::config::{Config, DEFAULT_MAX_BODY_BYTES};
use crate::observability::{metrics_middleware, request_id_middleware, MetricsState};
use crate::users_api::user_routes;

/// Settings that shape request handling.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Include panic details in 500 responses.
    pub expose_errors: bool,
    /// Maximum accepted JSON body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            expose_errors: false,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl From<&Config> for ApiSettings {
    fn from(config: &Config) -> Self {
        Self {
            expose_errors: config.expose_errors,
            max_body_bytes: config.max_body_bytes,
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// User store.
    pub users: Arc<UserStore>,
    /// Prometheus metrics.
    pub metrics: MetricsState,
    /// Request handling settings.
    pub settings: ApiSettings,
}

impl AppState {
    /// Creates state around an existing store with default settings.
    pub fn new(users: Arc<UserStore>) -> Self {
        Self::with_settings(users, ApiSettings::default())
    }

    /// Creates state around an existing store.
    pub fn with_settings(users: Arc<UserStore>, settings: ApiSettings) -> Self {
        let metrics = MetricsState::new();
        metrics.set_users(users.len());
        Self {
            users,
            metrics,
            settings,
        }
    }

    /// Stores a new user and counts it.
    pub(crate) fn create_user(&self, user: NewUser) -> UserRecord {
        let record = self.users.create(user);
        self.metrics.user_added();
        record
    }

    /// Deletes a user and uncounts it.
    pub(crate) fn delete_user(&self, id: u64) -> Result<UserRecord, UserError> {
        let record = self.users.delete(id)?;
        self.metrics.user_removed();
        Ok(record)
    }
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    User(#[from] UserError),
    #[error("Route {method} {path} not found")]
    RouteNotFound { method: Method, path: String },
    #[error("Request body exceeds maximum size of {limit} bytes")]
    PayloadTooLarge { limit: usize },
    #[error("Request body is not valid JSON: {0}")]
    MalformedBody(String),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            kind: None,
            message: message.into(),
            detail: None,
        }
    }

    /// The generic 500 body. `detail` is only set when errors are exposed.
    pub fn internal(detail: Option<String>) -> Self {
        Self {
            detail,
            ..Self::new("Internal server error", "An unexpected error occurred")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::User(UserError::NotFound { .. }) | ApiError::RouteNotFound { .. } => {
                (StatusCode::NOT_FOUND, ErrorResponse::new("Not found", self.to_string()))
            }
            ApiError::PayloadTooLarge { .. } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorResponse::new("Payload too large", self.to_string()),
            ),
            ApiError::MalformedBody(_) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    kind: Some("malformed_body".to_string()),
                    ..ErrorResponse::new("Validation failed", self.to_string())
                },
            ),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::internal(None),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// One entry of the capability listing.
#[derive(Debug, Serialize)]
pub struct Endpoint {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// Endpoints advertised by `GET /`.
pub const ENDPOINTS: &[Endpoint] = &[
    Endpoint {
        method: "GET",
        path: "/users",
        description: "List all users",
    },
    Endpoint {
        method: "GET",
        path: "/users/{id}",
        description: "Get a user by id",
    },
    Endpoint {
        method: "POST",
        path: "/users",
        description: "Create a user from firstName, lastName, and hobby",
    },
    Endpoint {
        method: "PUT",
        path: "/users/{id}",
        description: "Update any of firstName, lastName, and hobby",
    },
    Endpoint {
        method: "DELETE",
        path: "/users/{id}",
        description: "Delete a user",
    },
    Endpoint {
        method: "GET",
        path: "/health",
        description: "Health check",
    },
    Endpoint {
        method: "GET",
        path: "/metrics",
        description: "Prometheus metrics",
    },
];

/// Capability listing returned by `GET /`.
#[derive(Debug, Serialize)]
pub struct CapabilityListing {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: &'static [Endpoint],
}

/// Creates the API router.
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(capabilities))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .merge(user_routes(&state));

    with_middleware(routes, state)
}

/// Wraps `routes` in the shared fallback, panic, metrics, trace, and
/// request-id layers.
pub fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    let expose_errors = state.settings.expose_errors;

    routes
        .fallback(route_not_found)
        .method_not_allowed_fallback(route_not_found)
        .layer(CatchPanicLayer::custom(
            move |err: Box<dyn Any + Send + 'static>| panic_response(err, expose_errors),
        ))
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Static capability listing.
async fn capabilities() -> impl IntoResponse {
    Json(CapabilityListing {
        message: "User Management API is running",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ENDPOINTS,
    })
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Prometheus scrape endpoint.
async fn metrics_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let body = state
        .metrics
        .encode()
        .map_err(|e| ApiError::Internal(format!("failed to encode metrics: {e}")))?;

    Ok((
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        Body::from(body),
    )
        .into_response())
}

/// Fallback for unmatched routes.
async fn route_not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::RouteNotFound {
        method,
        path: uri.path().to_string(),
    }
}

/// Converts a handler panic into the generic 500 response.
fn panic_response(err: Box<dyn Any + Send + 'static>, expose_errors: bool) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal(expose_errors.then_some(detail))),
    )
        .into_response()
}
