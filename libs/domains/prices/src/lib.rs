//! Prices Domain
//!
//! Resolves, for a (brand, product, point-in-time) query, the single winning
//! price among possibly overlapping, time-bounded price-list entries.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │     Handlers     │  ← HTTP endpoint, problem+json mapping
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │     Service      │  ← input normalization, orchestration
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │ Resilient proxy  │  ← circuit breaker around store access
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │    Repository    │  ← data access (trait + implementations)
//! └──────────────────┘
//! ```
//!
//! The resilient proxy is the only path by which callers reach a repository;
//! a degraded store surfaces as a typed "unavailable" failure, never as a raw
//! infrastructure error and never conflated with "no applicable price".

pub mod datetime;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod resilient;
pub mod service;

// Re-export commonly used types
pub use error::{PriceError, PriceResult};
pub use models::{Price, PriceQuery, PriceQueryParams, PriceView};
pub use postgres::PgPriceRepository;
pub use repository::{InMemoryPriceRepository, PriceRepository};
pub use resilient::ResilientPriceRepository;
pub use service::PriceService;
