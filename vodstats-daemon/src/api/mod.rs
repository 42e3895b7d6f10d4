//! HTTP API module for the vodstats daemon.
//!
//! This module exposes channel video statistics to clients over HTTP.

pub mod handlers;
pub mod server;

pub use handlers::{ApiError, AppState};
pub use server::{router, serve, start_server};
