//! # Axum Helpers
//!
//! Utilities shared by Axum-based services.
//!
//! ## Modules
//!
//! - **[`problem`]**: RFC 7807 `application/problem+json` error responses
//!   with field-level validation errors
//! - **[`trace`]**: request trace-id extraction and propagation
//! - **[`server`]**: router assembly, API docs, health endpoints, graceful
//!   shutdown
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_app, create_router, health_router};
//! use core_config::server::ServerConfig;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_routes = Router::new(); // Add your routes
//!     let router = create_router::<ApiDoc>(api_routes).merge(health_router());
//!
//!     create_app(router, &ServerConfig::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod problem;
pub mod server;
pub mod trace;

pub use problem::{FieldError, Problem};
pub use server::{create_app, create_router, health_router};
pub use trace::TraceId;
