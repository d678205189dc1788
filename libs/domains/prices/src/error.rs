use axum_helpers::{FieldError, Problem};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PriceError {
    /// Legitimate empty resolution, a business outcome rather than a fault.
    #[error("Applicable price not found for the given product, brand and date.")]
    NotFound,

    #[error("One or more parameters are invalid.")]
    InvalidQuery(Vec<FieldError>),

    /// Resolution temporarily unavailable: circuit open or store degraded.
    #[error("{0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type PriceResult<T> = Result<T, PriceError>;

impl PriceError {
    /// Map to the problem+json payload for the given request path and trace id.
    ///
    /// Unclassified faults are logged with full context here; the caller only
    /// ever sees a generic detail message for those.
    pub fn into_problem(self, instance: &str, trace_id: &str) -> Problem {
        let problem = match self {
            PriceError::NotFound => Problem::not_found(
                "Applicable price not found for the given product, brand and date.",
            ),
            PriceError::InvalidQuery(errors) => {
                Problem::validation("One or more parameters are invalid.", errors)
            }
            PriceError::Unavailable(detail) => Problem::service_unavailable(detail),
            PriceError::Database(err) => {
                tracing::error!(error = %err, instance, trace_id, "unhandled database error");
                Problem::internal("Unexpected error")
            }
            PriceError::Internal(detail) => {
                tracing::error!(%detail, instance, trace_id, "unhandled internal error");
                Problem::internal("Unexpected error")
            }
        };

        problem.with_instance(instance).with_trace_id(trace_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let problem = PriceError::NotFound.into_problem("/api/v1/prices", "t-1");
        assert_eq!(problem.status, 404);
        assert_eq!(problem.instance, "/api/v1/prices");
        assert_eq!(problem.trace_id, "t-1");
        assert!(problem.errors.is_empty());
    }

    #[test]
    fn test_invalid_query_keeps_field_errors() {
        let problem = PriceError::InvalidQuery(vec![FieldError::missing(
            "brandId",
            "brandId is required",
        )])
        .into_problem("/api/v1/prices", "t-2");
        assert_eq!(problem.status, 400);
        assert_eq!(problem.errors.len(), 1);
        assert_eq!(problem.errors[0].field, "brandId");
    }

    #[test]
    fn test_database_error_hides_details() {
        let problem = PriceError::Database(sea_orm::DbErr::Custom("secret dsn".to_string()))
            .into_problem("/api/v1/prices", "t-3");
        assert_eq!(problem.status, 500);
        assert!(!problem.detail.contains("secret"));
    }

    #[test]
    fn test_unavailable_maps_to_503() {
        let problem = PriceError::Unavailable("circuit breaker 'price-store' is open".to_string())
            .into_problem("/api/v1/prices", "t-4");
        assert_eq!(problem.status, 503);
        assert!(problem.detail.contains("price-store"));
    }
}
