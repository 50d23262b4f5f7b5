//! Punjabi tutor API server library.
//!
//! Exposes the building blocks (config, state, error handling, services,
//! routes) so integration tests and the binaries can all reach them.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
pub mod telemetry;
