//! Read-only HTTP API: routing, API-key auth, and response mapping.

pub mod app;
pub mod context;
pub mod middleware;
