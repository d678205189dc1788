//! Async circuit breaker with a rolling outcome window.
//!
//! State machine:
//! - **Closed**: calls pass through; each outcome is recorded in a window of
//!   the most recent calls. Once the window holds enough samples and the
//!   failure rate reaches the configured threshold, the circuit opens.
//! - **Open**: calls are rejected immediately until the cooldown elapses;
//!   the first call after the cooldown runs as a trial (half-open).
//! - **HalfOpen**: a bounded number of trial calls are forwarded. A trial
//!   success closes the circuit and resets the window; a trial failure
//!   reopens it and restarts the cooldown.
//!
//! The breaker is an explicit, cloneable value: every clone shares the same
//! state, and independent breakers can guard independent dependencies.

use crate::config::CircuitBreakerConfig;
use crate::error::CircuitError;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

/// Observable state of a circuit breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone, Copy)]
enum State {
    Closed,
    Open { opened_at: Instant },
    HalfOpen,
}

#[derive(Debug)]
struct Inner {
    state: State,
    /// Rolling window of the most recent call outcomes; `true` is a failure.
    window: VecDeque<bool>,
    half_open_in_flight: usize,
}

/// Circuit breaker guarding calls to a single dependency.
#[derive(Clone)]
pub struct CircuitBreaker {
    name: Arc<str>,
    config: Arc<CircuitBreakerConfig>,
    inner: Arc<Mutex<Inner>>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<Arc<str>>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config: Arc::new(config),
            inner: Arc::new(Mutex::new(Inner {
                state: State::Closed,
                window: VecDeque::new(),
                half_open_in_flight: 0,
            })),
        }
    }

    /// The dependency name this breaker guards, used in errors and logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> CircuitState {
        match self.lock().state {
            State::Closed => CircuitState::Closed,
            State::Open { .. } => CircuitState::Open,
            State::HalfOpen => CircuitState::HalfOpen,
        }
    }

    /// Execute `op` under circuit breaker protection.
    ///
    /// Rejected immediately with [`CircuitError::Open`] while the circuit is
    /// open (or half-open with no trial slot free). Otherwise the outcome is
    /// recorded in the rolling window; a call exceeding the configured
    /// timeout is cut short and recorded as a failure.
    pub async fn call<T, E, F, Fut>(&self, op: F) -> Result<T, CircuitError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let permit = match self.try_acquire() {
            Ok(permit) => permit,
            Err(retry_after) => {
                return Err(CircuitError::Open {
                    name: self.name.to_string(),
                    retry_after,
                });
            }
        };

        let outcome = match self.config.call_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, op()).await {
                Ok(result) => result.map_err(CircuitError::Inner),
                Err(_) => Err(CircuitError::Timeout {
                    name: self.name.to_string(),
                    timeout,
                }),
            },
            None => op().await.map_err(CircuitError::Inner),
        };

        match outcome {
            Ok(value) => {
                permit.record_success();
                Ok(value)
            }
            Err(err) => {
                permit.record_failure();
                Err(err)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Held only for state inspection and transitions, never across awaits.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Admission check; returns a permit or the remaining cooldown.
    fn try_acquire(&self) -> Result<CallPermit<'_>, Duration> {
        let mut inner = self.lock();

        match inner.state {
            State::Closed => Ok(self.permit(false)),
            State::Open { opened_at } => {
                let elapsed = opened_at.elapsed();
                if elapsed >= self.config.cooldown {
                    inner.state = State::HalfOpen;
                    inner.half_open_in_flight = 1;
                    tracing::info!(
                        breaker = %self.name,
                        "cooldown elapsed, allowing trial call (half-open)"
                    );
                    Ok(self.permit(true))
                } else {
                    Err(self.config.cooldown - elapsed)
                }
            }
            State::HalfOpen => {
                if inner.half_open_in_flight < self.config.half_open_max_calls {
                    inner.half_open_in_flight += 1;
                    Ok(self.permit(true))
                } else {
                    Err(Duration::ZERO)
                }
            }
        }
    }

    fn permit(&self, trial: bool) -> CallPermit<'_> {
        CallPermit {
            breaker: self,
            trial,
            completed: false,
        }
    }

    fn on_success(&self, trial: bool) {
        let mut inner = self.lock();

        if trial {
            inner.half_open_in_flight = inner.half_open_in_flight.saturating_sub(1);
            if matches!(inner.state, State::HalfOpen) {
                inner.state = State::Closed;
                inner.window.clear();
                inner.half_open_in_flight = 0;
                tracing::info!(breaker = %self.name, "closed after successful trial call");
            }
        } else if matches!(inner.state, State::Closed) {
            Self::push_outcome(&mut inner, self.config.window_size, false);
        }
    }

    fn on_failure(&self, trial: bool) {
        let mut inner = self.lock();

        if trial {
            inner.state = State::Open {
                opened_at: Instant::now(),
            };
            inner.window.clear();
            inner.half_open_in_flight = 0;
            tracing::warn!(breaker = %self.name, "reopened after failed trial call");
        } else if matches!(inner.state, State::Closed) {
            Self::push_outcome(&mut inner, self.config.window_size, true);

            let samples = inner.window.len();
            if samples >= self.config.min_calls {
                let failures = inner.window.iter().filter(|failed| **failed).count();
                let rate = failures as f64 / samples as f64;
                if rate >= self.config.failure_rate_threshold {
                    inner.state = State::Open {
                        opened_at: Instant::now(),
                    };
                    inner.window.clear();
                    tracing::warn!(
                        breaker = %self.name,
                        failure_rate = rate,
                        samples,
                        "failure rate over threshold, circuit opened"
                    );
                }
            }
        }
    }

    fn release_trial(&self) {
        let mut inner = self.lock();
        inner.half_open_in_flight = inner.half_open_in_flight.saturating_sub(1);
    }

    fn push_outcome(inner: &mut Inner, window_size: usize, failed: bool) {
        inner.window.push_back(failed);
        while inner.window.len() > window_size {
            inner.window.pop_front();
        }
    }
}

impl std::fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("state", &self.state())
            .finish()
    }
}

/// Admission token for one guarded call.
///
/// Dropping the permit without recording an outcome (an abandoned call)
/// releases a half-open trial slot so a cancelled caller cannot wedge the
/// breaker in half-open.
struct CallPermit<'a> {
    breaker: &'a CircuitBreaker,
    trial: bool,
    completed: bool,
}

impl CallPermit<'_> {
    fn record_success(mut self) {
        self.completed = true;
        self.breaker.on_success(self.trial);
    }

    fn record_failure(mut self) {
        self.completed = true;
        self.breaker.on_failure(self.trial);
    }
}

impl Drop for CallPermit<'_> {
    fn drop(&mut self) {
        if !self.completed && self.trial {
            self.breaker.release_trial();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("store exploded")]
    struct StoreError;

    fn test_config() -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            window_size: 4,
            min_calls: 4,
            failure_rate_threshold: 0.5,
            cooldown: Duration::from_secs(10),
            half_open_max_calls: 1,
            call_timeout: None,
        }
    }

    async fn fail(breaker: &CircuitBreaker) {
        let result: Result<(), _> = breaker.call(|| async { Err(StoreError) }).await;
        assert!(result.is_err());
    }

    async fn succeed(breaker: &CircuitBreaker) {
        breaker
            .call(|| async { Ok::<_, StoreError>(()) })
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn closed_passes_value_through() {
        let breaker = CircuitBreaker::new("test", test_config());
        let value = breaker.call(|| async { Ok::<_, StoreError>(7) }).await;
        assert_eq!(value.unwrap(), 7);
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn stays_closed_below_min_samples() {
        let breaker = CircuitBreaker::new("test", test_config());
        for _ in 0..3 {
            fail(&breaker).await;
        }
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn opens_at_failure_threshold_and_rejects() {
        let breaker = CircuitBreaker::new("test", test_config());
        for _ in 0..4 {
            fail(&breaker).await;
        }
        assert_eq!(breaker.state(), CircuitState::Open);

        // Rejected without invoking the operation
        let invoked = AtomicUsize::new(0);
        let result: Result<(), _> = breaker
            .call(|| async {
                invoked.fetch_add(1, Ordering::SeqCst);
                Ok::<_, StoreError>(())
            })
            .await;
        assert!(matches!(result, Err(CircuitError::Open { .. })));
        assert_eq!(invoked.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn mixed_outcomes_below_rate_stay_closed() {
        let breaker = CircuitBreaker::new("test", test_config());
        // 1 failure out of 4 samples: 25% < 50%
        fail(&breaker).await;
        for _ in 0..3 {
            succeed(&breaker).await;
        }
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn trial_success_closes_circuit() {
        let breaker = CircuitBreaker::new("test", test_config());
        for _ in 0..4 {
            fail(&breaker).await;
        }
        assert_eq!(breaker.state(), CircuitState::Open);

        tokio::time::advance(Duration::from_secs(11)).await;
        succeed(&breaker).await;
        assert_eq!(breaker.state(), CircuitState::Closed);

        // and the window was reset: a few fresh failures do not reopen
        for _ in 0..3 {
            fail(&breaker).await;
        }
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn trial_failure_reopens_and_restarts_cooldown() {
        let breaker = CircuitBreaker::new("test", test_config());
        for _ in 0..4 {
            fail(&breaker).await;
        }

        tokio::time::advance(Duration::from_secs(11)).await;
        fail(&breaker).await; // the trial
        assert_eq!(breaker.state(), CircuitState::Open);

        // still rejecting before the restarted cooldown elapses
        let result: Result<(), _> = breaker.call(|| async { Ok::<_, StoreError>(()) }).await;
        assert!(matches!(result, Err(CircuitError::Open { .. })));

        tokio::time::advance(Duration::from_secs(11)).await;
        succeed(&breaker).await;
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_counts_as_failure() {
        let config = CircuitBreakerConfig {
            min_calls: 1,
            failure_rate_threshold: 1.0,
            call_timeout: Some(Duration::from_millis(50)),
            ..test_config()
        };
        let breaker = CircuitBreaker::new("test", config);

        let result: Result<(), CircuitError<StoreError>> = breaker
            .call(|| async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(CircuitError::Timeout { .. })));
        assert_eq!(breaker.state(), CircuitState::Open);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_trial_releases_its_slot() {
        let breaker = CircuitBreaker::new("test", test_config());
        for _ in 0..4 {
            fail(&breaker).await;
        }
        tokio::time::advance(Duration::from_secs(11)).await;

        // The trial call never completes; the caller gives up and drops it.
        let abandoned = tokio::time::timeout(
            Duration::from_millis(10),
            breaker.call(|| std::future::pending::<Result<(), StoreError>>()),
        )
        .await;
        assert!(abandoned.is_err());
        assert_eq!(breaker.state(), CircuitState::HalfOpen);

        // The slot is free again, so the next trial runs and closes the circuit.
        succeed(&breaker).await;
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_failures_do_not_double_open() {
        let breaker = CircuitBreaker::new("test", test_config());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let breaker = breaker.clone();
            handles.push(tokio::spawn(async move {
                let _: Result<(), _> = breaker.call(|| async { Err(StoreError) }).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        // Some calls may have been rejected once the circuit opened, but the
        // state itself must land in exactly Open.
        assert_eq!(breaker.state(), CircuitState::Open);
    }
}
