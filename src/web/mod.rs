//! Web API module for DreamEcho.
//!
//! This module exposes login, feed retrieval, audio proxying and
//! subscriptions over a JSON REST API.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
