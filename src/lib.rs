//! Tankpilot bot library.
//!
//! Exposes the world model, geometry, tactical queries, decision engine,
//! and protocol modules for use by integration tests and the binary entry
//! point.

pub mod config;
pub mod engine;
pub mod geometry;
pub mod protocol;
pub mod session;
pub mod tactics;
pub mod world;
