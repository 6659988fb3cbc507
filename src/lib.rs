//! RIFT ODDS: esports match dataset builder
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod wiki;
pub mod registry;
pub mod market;
pub mod engine;
pub mod dataset;
pub mod storage;
pub mod model;
