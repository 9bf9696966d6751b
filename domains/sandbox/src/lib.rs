//! Sandbox domain: operations, request gateway, HTTP API

pub mod api;
pub mod gateway;
pub mod operations;

pub use gateway::{outward_error, RequestGateway};
pub use operations::{SandboxOperation, DEFAULT_AURA_USERNAME, SCHEMA_QUERY};

// Re-export API types
pub use api::routes;
pub use api::SandboxState;
