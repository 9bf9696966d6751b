//! HTTP handlers for the Sandbox domain

pub mod backups;
pub mod queries;
pub mod sandboxes;
