//! HTTP API.
//!
//! Exposes the analysis pipeline as JSON endpoints nested under `/api/`.
//! The router is composable: `api_router()` returns a `Router` that can be
//! mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{start_server_on, ServerHandle};
pub use types::ApiContext;
