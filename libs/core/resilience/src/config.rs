use core_config::{env_parse_or_default, ConfigError, FromEnv};
use std::time::Duration;

/// Configuration for circuit breaker behavior.
#[derive(Clone, Debug)]
pub struct CircuitBreakerConfig {
    /// Number of most recent call outcomes kept in the rolling window
    pub window_size: usize,
    /// Minimum number of recorded outcomes before the failure rate is evaluated
    pub min_calls: usize,
    /// Failure rate (0.0..=1.0) within the window that opens the circuit
    pub failure_rate_threshold: f64,
    /// Duration the circuit stays open before a trial call is allowed
    pub cooldown: Duration,
    /// Maximum number of concurrent trial calls while half-open
    pub half_open_max_calls: usize,
    /// Per-call timeout; an expired call counts as a failure. None disables it.
    pub call_timeout: Option<Duration>,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            min_calls: 5,
            failure_rate_threshold: 0.5,
            cooldown: Duration::from_secs(30),
            half_open_max_calls: 1,
            call_timeout: Some(Duration::from_secs(2)),
        }
    }
}

impl FromEnv for CircuitBreakerConfig {
    /// Reads from environment variables, falling back to defaults:
    /// - BREAKER_WINDOW_SIZE (10)
    /// - BREAKER_MIN_CALLS (5)
    /// - BREAKER_FAILURE_RATE (0.5)
    /// - BREAKER_COOLDOWN_SECS (30)
    /// - BREAKER_HALF_OPEN_MAX_CALLS (1)
    /// - BREAKER_CALL_TIMEOUT_MS (2000, 0 disables the call timeout)
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let timeout_ms: u64 = env_parse_or_default(
            "BREAKER_CALL_TIMEOUT_MS",
            defaults
                .call_timeout
                .map(|t| t.as_millis() as u64)
                .unwrap_or(0),
        )?;

        Ok(Self {
            window_size: env_parse_or_default("BREAKER_WINDOW_SIZE", defaults.window_size)?,
            min_calls: env_parse_or_default("BREAKER_MIN_CALLS", defaults.min_calls)?,
            failure_rate_threshold: env_parse_or_default(
                "BREAKER_FAILURE_RATE",
                defaults.failure_rate_threshold,
            )?,
            cooldown: Duration::from_secs(env_parse_or_default(
                "BREAKER_COOLDOWN_SECS",
                defaults.cooldown.as_secs(),
            )?),
            half_open_max_calls: env_parse_or_default(
                "BREAKER_HALF_OPEN_MAX_CALLS",
                defaults.half_open_max_calls,
            )?,
            call_timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)),
        })
    }
}
