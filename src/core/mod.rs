//! Core functionality for the Gateway
//!
//! Routing, failover, circuit breaking and the upstream clients they drive.

pub mod circuit_breaker;
pub mod experimental;
pub mod providers;
pub mod router;
pub mod streaming;
pub mod types;
pub mod warmup;
