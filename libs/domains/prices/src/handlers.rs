use axum::extract::{OriginalUri, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use axum_helpers::{FieldError, Problem, TraceId};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{PriceQueryParams, PriceView};
use crate::repository::PriceRepository;
use crate::service::PriceService;

/// OpenAPI documentation for the Prices API
#[derive(OpenApi)]
#[openapi(
    paths(get_applicable_price),
    components(schemas(PriceView, Problem, FieldError)),
    tags(
        (name = "prices", description = "Price resolution endpoints")
    )
)]
pub struct ApiDoc;

/// Create the prices router with all HTTP endpoints
pub fn router<R: PriceRepository + 'static>(service: PriceService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/v1/prices", get(get_applicable_price))
        .with_state(shared_service)
}

/// Resolve the applicable price for a brand, product and instant
#[utoipa::path(
    get,
    path = "/v1/prices",
    tag = "prices",
    params(PriceQueryParams),
    responses(
        (status = 200, description = "Applicable price", body = PriceView),
        (status = 400, description = "Invalid query parameters", body = Problem,
            content_type = "application/problem+json"),
        (status = 404, description = "No applicable price", body = Problem,
            content_type = "application/problem+json"),
        (status = 503, description = "Price resolution temporarily unavailable", body = Problem,
            content_type = "application/problem+json")
    )
)]
async fn get_applicable_price<R: PriceRepository>(
    State(service): State<Arc<PriceService<R>>>,
    OriginalUri(uri): OriginalUri,
    trace_id: TraceId,
    Query(params): Query<PriceQueryParams>,
) -> Result<Json<PriceView>, Problem> {
    match service.get_applicable_price(params).await {
        Ok(view) => Ok(Json(view)),
        Err(err) => Err(err.into_problem(uri.path(), trace_id.as_str())),
    }
}
