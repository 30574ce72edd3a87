//! Shared infrastructure for the HTTP services in this workspace: layered
//! configuration, infrastructure errors, request middleware and tracing setup.

pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
