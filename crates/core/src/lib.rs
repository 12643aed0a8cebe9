//! Shared domain types and pure logic for the praxis backend.
//!
//! Everything here is I/O-free: the interval merger and the progress
//! calculators are plain functions over owned data, so the db and api
//! crates can share one implementation and tests can exercise the rules
//! without a database.

pub mod error;
pub mod interval;
pub mod progress;
pub mod roles;
pub mod types;
