//! Request trace-id propagation.
//!
//! Callers may correlate requests across services by sending an
//! `X-Request-Id` header; when it is absent or blank a fresh UUID is
//! generated so every response still carries a usable correlation id.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use std::convert::Infallible;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id for one request.
#[derive(Debug, Clone)]
pub struct TraceId(pub String);

impl TraceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Read the trace id from `X-Request-Id`, generating one when missing/blank.
pub fn trace_id_from_headers(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

impl<S: Send + Sync> FromRequestParts<S> for TraceId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(TraceId(trace_id_from_headers(&parts.headers)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_propagates_inbound_header() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("trace-42"));
        assert_eq!(trace_id_from_headers(&headers), "trace-42");
    }

    #[test]
    fn test_generates_when_missing() {
        let headers = HeaderMap::new();
        let trace_id = trace_id_from_headers(&headers);
        assert!(Uuid::parse_str(&trace_id).is_ok());
    }

    #[test]
    fn test_generates_when_blank() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("   "));
        let trace_id = trace_id_from_headers(&headers);
        assert!(Uuid::parse_str(&trace_id).is_ok());
    }
}
