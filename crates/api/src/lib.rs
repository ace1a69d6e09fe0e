//! HTTP API for the marketplace backend.
//!
//! Axum handlers are thin: authentication and the policy gate run in
//! extractors/helpers, then the handler delegates to `carelink-db`
//! (reads) or `carelink-lifecycle` (anything that moves a job or money)
//! and wraps the result in the response envelope.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
