//! # Request Validation Middleware
//!
//! Middleware that validates user bodies before the create and update
//! handlers run:
//!
//! - Request size limits
//! - JSON parsing
//! - Field presence, type, and blank checks (see [`roster_users::validation`])
//!
//! A passing body is normalized (every string trimmed) and handed to the
//! handler as a request extension: [`NewUser`] for create, [`UserPatch`] for
//! update. A failing body short-circuits with `400 Bad Request` and the
//! handler never runs.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use axum::{handler::Handler, middleware, routing::post, Extension, Router};
//! use roster_node::validation::validate_create_body;
//!
//! async fn create(Extension(user): Extension<roster_users::NewUser>) { /* ... */ }
//!
//! let app: Router = Router::new().route(
//!     "/users",
//!     post(create.layer(middleware::from_fn_with_state(settings, validate_create_body))),
//! );
//! ```

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use roster_users::{
    validate_create, validate_update, MissingFields, NewUser, UserField, UserPatch,
    ValidationFailure,
};
use serde::Serialize;
use serde_json::Value;
use validator::{ValidationError, ValidationErrors};

use crate::api::{ApiError, ApiSettings};

/// Validation error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrorResponse {
    /// Error type.
    pub error: String,
    /// Machine-readable failure kind.
    pub kind: String,
    /// Human-readable message.
    pub message: String,
    /// Per-field missing flags, only for `missing_fields`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<MissingFields>,
    /// Field-level error details.
    pub details: Vec<FieldError>,
}

/// Field-level validation error.
#[derive(Debug, Serialize)]
pub struct FieldError {
    /// Field name.
    pub field: String,
    /// Error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl IntoResponse for ValidationErrorResponse {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

/// Flatten `ValidationErrors` into field details, ordered like the fields.
fn field_details(errors: ValidationErrors) -> Vec<FieldError> {
    let mut details: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                code: e.code.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Validation failed for field '{}'", field)),
            })
        })
        .collect();

    details.sort_by_key(|detail| {
        UserField::ALL
            .iter()
            .position(|f| f.json_key() == detail.field)
            .unwrap_or(usize::MAX)
    });
    details
}

/// Per-field errors for a failure.
fn field_errors(failure: &ValidationFailure) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    for field in failure.fields() {
        let (code, message) = match failure {
            ValidationFailure::MissingFields(_) => {
                ("required", format!("{} is required.", field.label()))
            }
            ValidationFailure::TypeMismatch { .. } => {
                ("type", format!("{} must be a string.", field.label()))
            }
            ValidationFailure::EmptyAfterTrim(_) => ("blank", failure.to_string()),
            ValidationFailure::NoFieldsProvided => {
                ("at_least_one", format!("{} was not provided.", field.label()))
            }
        };

        let mut err = ValidationError::new(code);
        err.message = Some(message.into());
        errors.add(field.json_key(), err);
    }

    errors
}

impl From<ValidationFailure> for ValidationErrorResponse {
    fn from(failure: ValidationFailure) -> Self {
        let missing_fields = match &failure {
            ValidationFailure::MissingFields(missing) => Some(*missing),
            _ => None,
        };

        ValidationErrorResponse {
            error: "Validation failed".to_string(),
            kind: failure.kind().to_string(),
            message: failure.to_string(),
            missing_fields,
            details: field_details(field_errors(&failure)),
        }
    }
}

/// Buffer and parse a JSON body.
///
/// An empty body parses as `{}` so it reaches the field checks instead of
/// failing as malformed.
async fn read_json_body(
    request: Request,
    max_body_bytes: usize,
) -> Result<(axum::http::request::Parts, Value), ApiError> {
    if let Some(content_length) = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<usize>().ok())
    {
        if content_length > max_body_bytes {
            return Err(ApiError::PayloadTooLarge {
                limit: max_body_bytes,
            });
        }
    }

    let (parts, body) = request.into_parts();
    let bytes: Bytes = axum::body::to_bytes(body, max_body_bytes)
        .await
        .map_err(|_| ApiError::PayloadTooLarge {
            limit: max_body_bytes,
        })?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok((parts, Value::Object(Default::default())));
    }

    let value = serde_json::from_slice(&bytes).map_err(|e| ApiError::MalformedBody(e.to_string()))?;
    Ok((parts, value))
}

/// Validates a create body and passes a [`NewUser`] on to the handler.
pub async fn validate_create_body(
    State(settings): State<ApiSettings>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = match read_json_body(request, settings.max_body_bytes).await {
        Ok(parsed) => parsed,
        Err(e) => return e.into_response(),
    };

    let user: NewUser = match validate_create(&body) {
        Ok(user) => user,
        Err(failure) => {
            tracing::debug!(kind = failure.kind(), "Create body rejected");
            return ValidationErrorResponse::from(failure).into_response();
        }
    };

    parts.extensions.insert(user);
    next.run(Request::from_parts(parts, axum::body::Body::empty()))
        .await
}

/// Validates an update body and passes a [`UserPatch`] on to the handler.
pub async fn validate_update_body(
    State(settings): State<ApiSettings>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = match read_json_body(request, settings.max_body_bytes).await {
        Ok(parsed) => parsed,
        Err(e) => return e.into_response(),
    };

    let patch: UserPatch = match validate_update(&body) {
        Ok(patch) => patch,
        Err(failure) => {
            tracing::debug!(kind = failure.kind(), "Update body rejected");
            return ValidationErrorResponse::from(failure).into_response();
        }
    };

    parts.extensions.insert(patch);
    next.run(Request::from_parts(parts, axum::body::Body::empty()))
        .await
}
