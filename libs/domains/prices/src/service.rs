use axum_helpers::FieldError;
use std::sync::Arc;

use crate::datetime;
use crate::error::{PriceError, PriceResult};
use crate::models::{PriceQuery, PriceQueryParams, PriceView};
use crate::repository::PriceRepository;

/// Query facade: normalizes raw request input, delegates resolution to the
/// repository behind it, and maps the outcome to the caller-facing view.
///
/// This layer never retries; backoff toward a degraded store is entirely the
/// resilient proxy's concern.
#[derive(Clone)]
pub struct PriceService<R: PriceRepository> {
    repository: Arc<R>,
}

impl<R: PriceRepository> PriceService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Resolve the single applicable price for the raw request input.
    ///
    /// All parameters are validated before the store is touched, and every
    /// invalid field is reported, not just the first one found.
    pub async fn get_applicable_price(&self, params: PriceQueryParams) -> PriceResult<PriceView> {
        let query = build_query(params)?;

        tracing::debug!(
            brand_id = query.brand_id,
            product_id = query.product_id,
            as_of = %query.as_of,
            "resolving applicable price"
        );

        match self.repository.find_applicable(query).await? {
            Some(price) => Ok(PriceView::from(price)),
            None => Err(PriceError::NotFound),
        }
    }
}

fn build_query(params: PriceQueryParams) -> PriceResult<PriceQuery> {
    let mut errors = Vec::new();

    let brand_id = parse_id("brandId", params.brand_id, &mut errors);
    let product_id = parse_id("productId", params.product_id, &mut errors);

    let as_of = match params.application_date {
        None => {
            errors.push(FieldError::missing(
                "applicationDate",
                "applicationDate is required",
            ));
            None
        }
        Some(raw) => match datetime::parse_application_date(raw.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                errors.push(FieldError::new(
                    "applicationDate",
                    raw,
                    "applicationDate must match the format dd/MM/yyyy HH:mm:ss",
                ));
                None
            }
        },
    };

    match (brand_id, product_id, as_of) {
        (Some(brand_id), Some(product_id), Some(as_of)) => Ok(PriceQuery {
            brand_id,
            product_id,
            as_of,
        }),
        _ => Err(PriceError::InvalidQuery(errors)),
    }
}

fn parse_id(field: &str, raw: Option<String>, errors: &mut Vec<FieldError>) -> Option<i32> {
    match raw {
        None => {
            errors.push(FieldError::missing(field, format!("{field} is required")));
            None
        }
        Some(raw) => match raw.trim().parse::<i32>() {
            Ok(value) => Some(value),
            Err(_) => {
                errors.push(FieldError::new(
                    field,
                    raw,
                    format!("{field} must be an integer"),
                ));
                None
            }
        },
    }
}
