use async_trait::async_trait;
use core_resilience::{CircuitBreaker, CircuitError};
use std::sync::Arc;

use crate::error::{PriceError, PriceResult};
use crate::models::{Price, PriceQuery};
use crate::repository::PriceRepository;

/// Circuit-breaker-guarded proxy in front of a price repository.
///
/// This is the single authoritative entry point for resolution: the wrapped
/// repository is owned here and is never reachable around the proxy. An
/// empty resolution passes through untouched; every infrastructure failure
/// (open circuit, timed-out call, store fault) is recorded against the
/// breaker and surfaces as [`PriceError::Unavailable`], so callers can always
/// tell "no price found" apart from "resolution temporarily unavailable".
#[derive(Clone)]
pub struct ResilientPriceRepository<R> {
    inner: Arc<R>,
    breaker: CircuitBreaker,
}

impl<R> ResilientPriceRepository<R> {
    pub fn new(inner: R, breaker: CircuitBreaker) -> Self {
        Self {
            inner: Arc::new(inner),
            breaker,
        }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }
}

#[async_trait]
impl<R: PriceRepository> PriceRepository for ResilientPriceRepository<R> {
    async fn find_applicable(&self, query: PriceQuery) -> PriceResult<Option<Price>> {
        match self.breaker.call(|| self.inner.find_applicable(query)).await {
            Ok(outcome) => Ok(outcome),
            Err(CircuitError::Open { name, .. }) => {
                Err(PriceError::Unavailable(format!(
                    "Circuit breaker '{name}' is open; price resolution is temporarily unavailable."
                )))
            }
            Err(CircuitError::Timeout { name, timeout }) => {
                tracing::warn!(breaker = %name, ?timeout, "price store call timed out");
                Err(PriceError::Unavailable(format!(
                    "Circuit breaker '{name}' timed out while accessing the price store."
                )))
            }
            Err(CircuitError::Inner(err)) => {
                tracing::error!(error = %err, "price store call failed");
                Err(PriceError::Unavailable(format!(
                    "Circuit breaker '{}' encountered a persistent error while accessing the price store.",
                    self.breaker.name()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_resilience::{CircuitBreakerConfig, CircuitState};
    use sea_orm::DbErr;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::datetime;

    #[derive(Clone, Default)]
    struct StubRepository {
        state: Arc<StubState>,
    }

    #[derive(Default)]
    struct StubState {
        healthy: AtomicBool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PriceRepository for StubRepository {
        async fn find_applicable(&self, _query: PriceQuery) -> PriceResult<Option<Price>> {
            self.state.calls.fetch_add(1, Ordering::SeqCst);
            if self.state.healthy.load(Ordering::SeqCst) {
                Ok(None)
            } else {
                Err(PriceError::Database(DbErr::Custom(
                    "connection refused".to_string(),
                )))
            }
        }
    }

    fn config() -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            window_size: 2,
            min_calls: 2,
            failure_rate_threshold: 1.0,
            cooldown: Duration::from_secs(5),
            half_open_max_calls: 1,
            call_timeout: None,
        }
    }

    fn query() -> PriceQuery {
        PriceQuery {
            brand_id: 1,
            product_id: 35455,
            as_of: datetime::parse_application_date("14/06/2020 16:00:00").unwrap(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_healthy_store_passes_outcome_through() {
        let stub = StubRepository::default();
        stub.state.healthy.store(true, Ordering::SeqCst);
        let repo = ResilientPriceRepository::new(stub, CircuitBreaker::new("test", config()));

        let outcome = repo.find_applicable(query()).await.unwrap();
        assert!(outcome.is_none());
        assert_eq!(repo.breaker().state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_fault_surfaces_as_unavailable_not_raw() {
        let stub = StubRepository::default();
        let repo = ResilientPriceRepository::new(stub, CircuitBreaker::new("test", config()));

        let err = repo.find_applicable(query()).await.unwrap_err();
        assert!(matches!(err, PriceError::Unavailable(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_circuit_short_circuits_the_store() {
        let stub = StubRepository::default();
        let state = stub.state.clone();
        let repo = ResilientPriceRepository::new(stub, CircuitBreaker::new("test", config()));

        for _ in 0..2 {
            let _ = repo.find_applicable(query()).await;
        }
        assert_eq!(repo.breaker().state(), CircuitState::Open);
        assert_eq!(state.calls.load(Ordering::SeqCst), 2);

        // rejected without another store call
        let err = repo.find_applicable(query()).await.unwrap_err();
        assert!(matches!(err, PriceError::Unavailable(_)));
        assert_eq!(state.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovery_after_cooldown() {
        let stub = StubRepository::default();
        let state = stub.state.clone();
        let repo = ResilientPriceRepository::new(stub, CircuitBreaker::new("test", config()));

        for _ in 0..2 {
            let _ = repo.find_applicable(query()).await;
        }
        assert_eq!(repo.breaker().state(), CircuitState::Open);

        state.healthy.store(true, Ordering::SeqCst);
        tokio::time::advance(Duration::from_secs(6)).await;

        let outcome = repo.find_applicable(query()).await.unwrap();
        assert!(outcome.is_none());
        assert_eq!(repo.breaker().state(), CircuitState::Closed);
    }
}
