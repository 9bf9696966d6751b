//! Route definitions for Sandbox domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{backups, queries, sandboxes};
use super::middleware::SandboxState;

/// Create sandbox lifecycle routes
fn sandbox_routes() -> Router<SandboxState> {
    Router::new()
        .route("/list-sandboxes", get(sandboxes::list_sandboxes))
        .route("/start-sandbox", post(sandboxes::start_sandbox))
        .route("/terminate-sandbox", post(sandboxes::terminate_sandbox))
        .route("/extend-sandbox", post(sandboxes::extend_sandbox))
        .route(
            "/get-sandbox-details/{sandbox_hash_key}",
            get(sandboxes::get_sandbox_details),
        )
}

/// Create backup and Aura upload routes
fn backup_routes() -> Router<SandboxState> {
    Router::new()
        .route(
            "/request-backup/{sandbox_hash_key}",
            post(backups::request_backup),
        )
        .route("/backups/result/{result_id}", get(backups::get_backup_result))
        .route("/list-backups/{sandbox_hash_key}", get(backups::list_backups))
        .route(
            "/get-backup-download-url/{sandbox_hash_key}",
            post(backups::get_backup_download_url),
        )
        .route("/upload-to-aura", post(backups::upload_to_aura))
        .route(
            "/aura-upload/result/{result_id}",
            get(backups::get_aura_upload_result),
        )
}

/// Create Cypher query routes
fn query_routes() -> Router<SandboxState> {
    Router::new()
        .route("/query/schema", get(queries::get_schema))
        .route("/query/read", post(queries::read_query))
        .route("/query/write", post(queries::write_query))
}

/// Create all Sandbox domain API routes
pub fn routes() -> Router<SandboxState> {
    Router::new()
        .merge(sandbox_routes())
        .merge(backup_routes())
        .merge(query_routes())
}
