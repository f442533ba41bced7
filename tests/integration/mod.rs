//! Integration tests for prompt-gateway
//!
//! These wire real components together and talk HTTP to mock upstreams.

pub mod config_tests;
pub mod failover_tests;
pub mod gateway_http_tests;
