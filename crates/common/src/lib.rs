//! Shared utilities, configuration, and error handling for Sandgate
//!
//! This crate provides common functionality used across the gateway:
//! - Configuration management following 12-factor principles
//! - The outward error type and its HTTP mapping
//! - Request body extraction with validation

pub mod config;
pub mod error;
pub mod extractors;

pub use config::Config;
pub use error::{Error, Result};
pub use extractors::{ValidatedJson, ValidatedQuery};
