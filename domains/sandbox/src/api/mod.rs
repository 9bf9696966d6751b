//! API layer for the Sandbox domain
//!
//! Contains HTTP handlers, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::SandboxState;
pub use routes::routes;
