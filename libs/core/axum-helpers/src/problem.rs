//! RFC 7807 problem responses.
//!
//! Every error leaving a service is an `application/problem+json` payload
//! with one stable shape, so clients can handle failures programmatically
//! without parsing free-form messages.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Problem `type` URIs, one per error class.
pub mod types {
    pub const NOT_FOUND: &str = "https://example.com/probs/not-found";
    pub const VALIDATION: &str = "https://example.com/probs/validation";
    pub const SERVICE_UNAVAILABLE: &str = "https://example.com/probs/service-unavailable";
    pub const INTERNAL: &str = "https://example.com/probs/internal";
}

/// One rejected request field inside a validation problem.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// Name of the offending request field
    pub field: String,
    /// The value that was rejected (null when the field was missing)
    #[schema(value_type = Object)]
    pub rejected_value: serde_json::Value,
    /// Human-readable description of what is wrong
    pub message: String,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        rejected_value: impl Into<serde_json::Value>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            rejected_value: rejected_value.into(),
            message: message.into(),
        }
    }

    /// A field that was required but absent from the request.
    pub fn missing(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, serde_json::Value::Null, message)
    }
}

/// Machine-parseable error payload (RFC 7807, extended with `traceId` and
/// field-level `errors`).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    /// URI identifying the error class
    #[serde(rename = "type")]
    pub type_uri: String,
    /// Short human-readable summary of the error class
    pub title: String,
    /// HTTP status code
    pub status: u16,
    /// Human-readable explanation specific to this occurrence
    pub detail: String,
    /// Request path that produced the problem
    pub instance: String,
    /// RFC 3339 timestamp of when the problem was produced
    pub timestamp: String,
    /// Correlation id, propagated from `X-Request-Id` or generated
    pub trace_id: String,
    /// Field-level validation errors; empty when not applicable
    pub errors: Vec<FieldError>,
}

impl Problem {
    pub fn new(
        status: StatusCode,
        type_uri: &str,
        title: &str,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            type_uri: type_uri.to_string(),
            title: title.to_string(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: String::new(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            trace_id: String::new(),
            errors: Vec::new(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, types::NOT_FOUND, "Not Found", detail)
    }

    pub fn validation(detail: impl Into<String>, errors: Vec<FieldError>) -> Self {
        let mut problem = Self::new(
            StatusCode::BAD_REQUEST,
            types::VALIDATION,
            "Validation failed",
            detail,
        );
        problem.errors = errors;
        problem
    }

    pub fn service_unavailable(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            types::SERVICE_UNAVAILABLE,
            "Service Unavailable",
            detail,
        )
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            types::INTERNAL,
            "Internal Server Error",
            detail,
        )
    }

    /// Attach the request path this problem occurred on.
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = instance.into();
        self
    }

    /// Attach the request's correlation id.
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = (status, Json(self)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}
