//! Server assembly: router composition, docs, health, graceful shutdown.

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_app, create_router};
pub use health::health_router;
pub use shutdown::shutdown_signal;
