//! Per-model circuit breaker for the experimental route
//!
//! Each model id gets a closed / open / half-open state machine fed by a
//! sliding window of recent call outcomes. Circuits are created lazily and
//! the table is capped with least-recently-accessed eviction.

mod breaker;
mod types;

pub use breaker::CircuitBreakerRegistry;
pub use types::{CircuitBreakerConfig, CircuitSnapshot, CircuitState, Clock, SystemClock};
