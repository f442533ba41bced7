//! Per-model circuit breaker registry

use super::types::{
    Circuit, CircuitBreakerConfig, CircuitSnapshot, CircuitState, Clock, Outcome, SystemClock,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// One circuit per model id, shared by every request.
///
/// The whole table sits behind a single lock, so each check-then-mutate
/// sequence (read window, evaluate threshold, change state) is atomic.
pub struct CircuitBreakerRegistry {
    config: CircuitBreakerConfig,
    clock: Arc<dyn Clock>,
    inner: Mutex<Inner>,
}

struct Inner {
    circuits: HashMap<String, Circuit>,
    last_cleanup: Instant,
    next_seq: u64,
}

impl Default for CircuitBreakerRegistry {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}

impl CircuitBreakerRegistry {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: CircuitBreakerConfig, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        Self {
            config,
            clock,
            inner: Mutex::new(Inner {
                circuits: HashMap::new(),
                last_cleanup: now,
                next_seq: 0,
            }),
        }
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Permission check for one call.
    ///
    /// Not a pure query: an open circuit whose timer has expired flips to
    /// half-open here and the caller receives the single trial slot.
    pub fn can_call(&self, model: &str) -> bool {
        let now = self.clock.now();
        let mut inner = self.inner.lock();
        let circuit = inner.touch(model, now, &self.config);

        match circuit.state {
            CircuitState::Closed => true,
            CircuitState::Open => {
                let expired = circuit
                    .opened_at
                    .is_none_or(|at| now.saturating_duration_since(at) >= self.config.open_duration);
                if expired {
                    info!(model = %model, "Circuit half-open, allowing trial call");
                    circuit.state = CircuitState::HalfOpen;
                    circuit.trial_in_flight = true;
                }
                expired
            }
            CircuitState::HalfOpen => {
                if circuit.trial_in_flight {
                    debug!(model = %model, "Trial call already in flight");
                    false
                } else {
                    circuit.trial_in_flight = true;
                    true
                }
            }
        }
    }

    /// Record the outcome of a completed call
    pub fn record_outcome(&self, model: &str, success: bool) {
        let now = self.clock.now();
        let mut inner = self.inner.lock();
        let config = &self.config;
        let circuit = inner.touch(model, now, config);

        match circuit.state {
            CircuitState::HalfOpen => {
                circuit.trial_in_flight = false;
                if success {
                    info!(model = %model, "Trial call succeeded, circuit closed");
                    circuit.state = CircuitState::Closed;
                    circuit.opened_at = None;
                    circuit.window.clear();
                } else {
                    warn!(model = %model, "Trial call failed, circuit re-opened");
                    circuit.state = CircuitState::Open;
                    circuit.opened_at = Some(now);
                }
            }
            CircuitState::Open => {
                debug!(model = %model, success, "Outcome ignored while circuit is open");
            }
            CircuitState::Closed => {
                circuit.window.push_back(Outcome { success, at: now });
                while circuit.window.len() > config.window_size {
                    circuit.window.pop_front();
                }

                if circuit.window.len() == config.window_size {
                    let successes = circuit.success_count();
                    let rate = successes as f64 / config.window_size as f64;
                    if rate < config.min_success_rate {
                        warn!(
                            model = %model,
                            successes,
                            window = config.window_size,
                            "Success rate below threshold, circuit opened"
                        );
                        circuit.state = CircuitState::Open;
                        circuit.opened_at = Some(now);
                    }
                }
            }
        }
    }

    /// Give back a half-open trial slot when the permitted call was never made
    pub fn release_trial(&self, model: &str) {
        let now = self.clock.now();
        let mut inner = self.inner.lock();
        let circuit = inner.touch(model, now, &self.config);
        if circuit.state == CircuitState::HalfOpen {
            circuit.trial_in_flight = false;
        }
    }

    /// Introspect a circuit; creates it lazily and refreshes its LRU position
    pub fn state(&self, model: &str) -> CircuitSnapshot {
        let now = self.clock.now();
        let mut inner = self.inner.lock();
        inner.touch(model, now, &self.config).snapshot()
    }

    /// Number of tracked circuits
    pub fn len(&self) -> usize {
        self.inner.lock().circuits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evict least-recently-accessed circuits down to the cap, regardless of
    /// the cleanup cadence. Returns how many were evicted.
    pub fn evict_least_recent(&self) -> usize {
        let now = self.clock.now();
        let mut inner = self.inner.lock();
        inner.last_cleanup = now;
        inner.evict(self.config.max_circuits, None)
    }
}

impl Inner {
    /// Fetch or create a circuit, refresh its access stamp, and run the
    /// periodic cleanup when it is due. The touched circuit is never evicted.
    fn touch(&mut self, model: &str, now: Instant, config: &CircuitBreakerConfig) -> &mut Circuit {
        self.next_seq += 1;
        let seq = self.next_seq;
        let circuit = self
            .circuits
            .entry(model.to_string())
            .or_insert_with(|| Circuit::new(now, seq, config.window_size));
        circuit.last_accessed = now;
        circuit.access_seq = seq;

        if now.saturating_duration_since(self.last_cleanup) >= config.cleanup_interval {
            self.last_cleanup = now;
            let evicted = self.evict(config.max_circuits, Some(model));
            if evicted > 0 {
                debug!(evicted, "Evicted idle circuits");
            }
        }

        self.circuits
            .entry(model.to_string())
            .or_insert_with(|| Circuit::new(now, seq, config.window_size))
    }

    fn evict(&mut self, cap: usize, keep: Option<&str>) -> usize {
        let excess = self.circuits.len().saturating_sub(cap);
        if excess == 0 {
            return 0;
        }

        let mut by_age: Vec<(Instant, u64, String)> = self
            .circuits
            .iter()
            .filter(|(model, _)| keep != Some(model.as_str()))
            .map(|(model, c)| (c.last_accessed, c.access_seq, model.clone()))
            .collect();
        by_age.sort();

        let mut evicted = 0;
        for (_, _, model) in by_age.into_iter().take(excess) {
            self.circuits.remove(&model);
            evicted += 1;
        }
        evicted
    }
}
