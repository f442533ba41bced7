//! Types and configuration for the per-model circuit breaker

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Circuit is closed, requests flow normally
    Closed,
    /// Circuit is open, requests are rejected
    Open,
    /// Circuit is half-open, a single trial request is allowed
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half-open",
        }
    }
}

/// Circuit breaker configuration
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Number of recent outcomes kept per model
    pub window_size: usize,
    /// Success rate strictly below this opens a full window
    pub min_success_rate: f64,
    /// Time spent open before a trial call is permitted
    pub open_duration: Duration,
    /// Most circuits kept after cleanup
    pub max_circuits: usize,
    /// Minimum time between opportunistic cleanups
    pub cleanup_interval: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            window_size: 20,
            min_success_rate: 0.2,
            open_duration: Duration::from_secs(5 * 60),
            max_circuits: 100,
            cleanup_interval: Duration::from_secs(30 * 60),
        }
    }
}

/// Read-only view of one circuit
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitSnapshot {
    pub state: CircuitState,
    pub opened_at: Option<Instant>,
    pub window_size: usize,
    pub window_success_count: usize,
}

/// Time source, injectable so open timers can be driven by tests
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Outcome {
    pub success: bool,
    #[allow(dead_code)]
    pub at: Instant,
}

/// Mutable per-model state, only touched under the registry lock
#[derive(Debug)]
pub(super) struct Circuit {
    pub state: CircuitState,
    pub opened_at: Option<Instant>,
    pub window: VecDeque<Outcome>,
    pub trial_in_flight: bool,
    pub last_accessed: Instant,
    pub access_seq: u64,
}

impl Circuit {
    pub fn new(now: Instant, seq: u64, window_size: usize) -> Self {
        Self {
            state: CircuitState::Closed,
            opened_at: None,
            window: VecDeque::with_capacity(window_size),
            trial_in_flight: false,
            last_accessed: now,
            access_seq: seq,
        }
    }

    pub fn success_count(&self) -> usize {
        self.window.iter().filter(|o| o.success).count()
    }

    pub fn snapshot(&self) -> CircuitSnapshot {
        CircuitSnapshot {
            state: self.state,
            opened_at: self.opened_at,
            window_size: self.window.len(),
            window_success_count: self.success_count(),
        }
    }
}
