//! Sandbox lifecycle handlers
//!
//! - GET  /list-sandboxes                          : Running sandboxes of the caller
//! - POST /start-sandbox                           : Start a sandbox for a use case
//! - POST /terminate-sandbox                       : Stop a sandbox
//! - POST /extend-sandbox                          : Extend one or all sandboxes
//! - GET  /get-sandbox-details/{sandbox_hash_key}  : Connection details

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sandgate_auth::AuthUser;
use sandgate_common::{Result, ValidatedJson, ValidatedQuery};
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::api::middleware::SandboxState;
use crate::operations::SandboxOperation;

// ============================================================
// DTOs
// ============================================================

#[derive(Debug, Deserialize, Validate)]
pub struct ListSandboxesQuery {
    /// e.g. `America/New_York`, used by the backend for expiry times
    #[validate(length(min = 1, max = 64))]
    pub timezone: Option<String>,
}

/// Use cases include `blank-sandbox`, `movies`, `recommendations`, `fraud-detection`
#[derive(Debug, Deserialize, Validate)]
pub struct StartSandboxRequest {
    #[validate(length(min = 1, max = 100))]
    pub usecase: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StopSandboxRequest {
    #[validate(length(min = 1))]
    pub sandbox_hash_key: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ExtendSandboxRequest {
    pub sandbox_hash_key: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SandboxDetailsQuery {
    #[serde(default)]
    pub verify_connect: bool,
}

// ============================================================
// Handlers
// ============================================================

pub async fn list_sandboxes(
    AuthUser(identity): AuthUser,
    State(state): State<SandboxState>,
    ValidatedQuery(query): ValidatedQuery<ListSandboxesQuery>,
) -> Result<Json<Value>> {
    let operation = SandboxOperation::ListSandboxes {
        timezone: query.timezone,
    };
    Ok(Json(state.gateway.dispatch(&identity, operation).await?))
}

pub async fn start_sandbox(
    AuthUser(identity): AuthUser,
    State(state): State<SandboxState>,
    ValidatedJson(request): ValidatedJson<StartSandboxRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let operation = SandboxOperation::StartSandbox {
        usecase: request.usecase,
    };
    let body = state.gateway.dispatch(&identity, operation).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn terminate_sandbox(
    AuthUser(identity): AuthUser,
    State(state): State<SandboxState>,
    ValidatedJson(request): ValidatedJson<StopSandboxRequest>,
) -> Result<Json<Value>> {
    let operation = SandboxOperation::StopSandbox {
        sandbox_hash_key: request.sandbox_hash_key,
    };
    Ok(Json(state.gateway.dispatch(&identity, operation).await?))
}

pub async fn extend_sandbox(
    AuthUser(identity): AuthUser,
    State(state): State<SandboxState>,
    ValidatedJson(request): ValidatedJson<ExtendSandboxRequest>,
) -> Result<Json<Value>> {
    let operation = SandboxOperation::ExtendSandbox {
        sandbox_hash_key: request.sandbox_hash_key,
    };
    Ok(Json(state.gateway.dispatch(&identity, operation).await?))
}

pub async fn get_sandbox_details(
    AuthUser(identity): AuthUser,
    State(state): State<SandboxState>,
    Path(sandbox_hash_key): Path<String>,
    ValidatedQuery(query): ValidatedQuery<SandboxDetailsQuery>,
) -> Result<Json<Value>> {
    let operation = SandboxOperation::GetSandboxDetails {
        sandbox_hash_key,
        verify_connect: query.verify_connect,
    };
    Ok(Json(state.gateway.dispatch(&identity, operation).await?))
}
