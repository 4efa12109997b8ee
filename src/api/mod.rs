//! Clinic REST API.
//!
//! Exposes the clinic business logic as HTTP endpoints, nested under
//! `/api/`. Registration, login, and the health check are open; every
//! other route sits behind the bearer-token auth middleware.
//!
//! The router is composable — `clinic_api_router()` returns a `Router`
//! that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::clinic_api_router;
pub use server::{start_api_server_on, ApiServer, ApiSession};
pub use types::ApiContext;
