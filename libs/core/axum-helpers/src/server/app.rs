use super::shutdown::shutdown_signal;
use crate::problem::Problem;
use crate::trace::TraceId;
use axum::extract::OriginalUri;
use axum::routing::get;
use axum::{Json, Router};
use core_config::server::ServerConfig;
use std::io;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Starts the Axum server with graceful shutdown.
///
/// # Errors
/// Returns an error if the TCP listener fails to bind to the configured
/// address or the server encounters an error during operation.
pub async fn create_app(router: Router, server_config: &ServerConfig) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;

    info!("Server starting on {}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        })?;

    Ok(())
}

/// Creates a configured Axum router with common middleware and documentation.
///
/// This function sets up:
/// - API routes nested under `/api`
/// - OpenAPI JSON at `/api-docs/openapi.json` and a Scalar reference UI at `/scalar`
/// - Request tracing and response compression
/// - A problem+json 404 fallback for unknown routes
///
/// Domain routers apply their own state before being passed in; this function
/// only combines them with the cross-cutting concerns.
///
/// # Type Parameters
/// * `T` - A type implementing `utoipa::OpenApi` for API documentation
pub fn create_router<T>(apis: Router) -> Router
where
    T: OpenApi + 'static,
{
    use utoipa_scalar::{Scalar, Servable};

    let spec = T::openapi();
    let spec_route = get(move || {
        let spec = spec.clone();
        async move { Json(spec) }
    });

    Router::new()
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .route("/api-docs/openapi.json", spec_route)
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
}

/// Fallback for unknown routes, keeping the problem+json error contract.
async fn not_found(OriginalUri(uri): OriginalUri, trace_id: TraceId) -> Problem {
    Problem::not_found("Resource not found")
        .with_instance(uri.path())
        .with_trace_id(trace_id.0)
}
