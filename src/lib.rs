//! TILLER — Multi-wallet DeFi task runner
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod accounts;
pub mod chain;
pub mod config;
pub mod engine;
pub mod portal;
pub mod types;
