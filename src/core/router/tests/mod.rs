//! Router tests module
//!
//! Failover, experimental routing and model parsing.
