//! Resilience primitives for calls to flaky dependencies.
//!
//! Currently this provides a single building block: an async
//! [`CircuitBreaker`] that tracks call outcomes in a rolling window and
//! fails fast while a dependency is unhealthy.
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_resilience::{CircuitBreaker, CircuitBreakerConfig, CircuitError};
//!
//! # #[derive(Debug, thiserror::Error)]
//! # #[error("query failed")]
//! # struct QueryError;
//! # async fn run() {
//! let breaker = CircuitBreaker::new("price-store", CircuitBreakerConfig::default());
//!
//! let result: Result<u32, CircuitError<QueryError>> = breaker
//!     .call(|| async { Ok::<_, QueryError>(42) })
//!     .await;
//! # }
//! ```

pub mod circuit_breaker;
pub mod config;
pub mod error;

pub use circuit_breaker::{CircuitBreaker, CircuitState};
pub use config::CircuitBreakerConfig;
pub use error::CircuitError;
