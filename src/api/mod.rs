//! HTTP API.
//!
//! Exposes the dashboard operations as JSON endpoints. Routes are
//! nested under `/api/` and wrapped in request logging and CORS.
//!
//! The router is composable: `api_router()` returns a `Router`
//! that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer, ApiSession};
pub use types::ApiContext;
