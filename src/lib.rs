//! Raid Planner API - caching proxy for the tarkov.dev GraphQL API
//!
//! Fronts the game-data GraphQL endpoint, derives relationships the raw data
//! only declares one way (which tasks unlock which, ammo tier classification)
//! and re-exposes the result over a small REST surface with a process-local
//! TTL cache in between.
//!
//! # Architecture
//!
//! - **model**: Wire/data types (Task, AmmoRound, MapDetail)
//! - **upstream**: GraphQL client behind the `Upstream` trait
//! - **cache**: In-memory TTL store, the only shared mutable state
//! - **derive**: Post-fetch derivation passes (reverse unlocks, ammo tiers)
//! - **query**: Map synonym resolution and task selection
//! - **service**: The read-through pipeline tying the above together
//! - **server**: axum routes, CORS, status mapping

pub mod cache;
pub mod config;
pub mod derive;
pub mod error;
pub mod logging;
pub mod model;
pub mod query;
pub mod server;
pub mod service;
pub mod upstream;

// Re-exports
pub use error::{PlannerError, Result};
