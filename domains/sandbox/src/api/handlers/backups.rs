//! Backup and Aura upload handlers
//!
//! - POST /request-backup/{sandbox_hash_key}
//! - GET  /backups/result/{result_id}
//! - GET  /list-backups/{sandbox_hash_key}
//! - POST /get-backup-download-url/{sandbox_hash_key}
//! - POST /upload-to-aura
//! - GET  /aura-upload/result/{result_id}

use axum::{
    extract::{Path, State},
    Json,
};
use sandgate_auth::AuthUser;
use sandgate_common::{Result, ValidatedJson};
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::api::middleware::SandboxState;
use crate::operations::{SandboxOperation, DEFAULT_AURA_USERNAME};

// ============================================================
// DTOs
// ============================================================

#[derive(Debug, Deserialize, Validate)]
pub struct BackupDownloadUrlRequest {
    /// Storage key of the backup file, as returned by list-backups
    #[validate(length(min = 1))]
    pub key: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AuraUploadRequest {
    #[validate(length(min = 1))]
    pub sandbox_hash_key: String,
    /// e.g. `neo4j+s://xxxx.databases.neo4j.io`
    #[validate(length(min = 1))]
    pub aura_uri: String,
    #[validate(length(min = 1))]
    pub aura_password: String,
    pub aura_username: Option<String>,
}

// ============================================================
// Handlers
// ============================================================

pub async fn request_backup(
    AuthUser(identity): AuthUser,
    State(state): State<SandboxState>,
    Path(sandbox_hash_key): Path<String>,
) -> Result<Json<Value>> {
    let operation = SandboxOperation::RequestBackup { sandbox_hash_key };
    Ok(Json(state.gateway.dispatch(&identity, operation).await?))
}

pub async fn get_backup_result(
    AuthUser(identity): AuthUser,
    State(state): State<SandboxState>,
    Path(result_id): Path<String>,
) -> Result<Json<Value>> {
    let operation = SandboxOperation::GetBackupResult { result_id };
    Ok(Json(state.gateway.dispatch(&identity, operation).await?))
}

pub async fn list_backups(
    AuthUser(identity): AuthUser,
    State(state): State<SandboxState>,
    Path(sandbox_hash_key): Path<String>,
) -> Result<Json<Value>> {
    let operation = SandboxOperation::ListBackups { sandbox_hash_key };
    Ok(Json(state.gateway.dispatch(&identity, operation).await?))
}

pub async fn get_backup_download_url(
    AuthUser(identity): AuthUser,
    State(state): State<SandboxState>,
    Path(sandbox_hash_key): Path<String>,
    ValidatedJson(request): ValidatedJson<BackupDownloadUrlRequest>,
) -> Result<Json<Value>> {
    let operation = SandboxOperation::GetBackupDownloadUrl {
        sandbox_hash_key,
        key: request.key,
    };
    Ok(Json(state.gateway.dispatch(&identity, operation).await?))
}

pub async fn upload_to_aura(
    AuthUser(identity): AuthUser,
    State(state): State<SandboxState>,
    ValidatedJson(request): ValidatedJson<AuraUploadRequest>,
) -> Result<Json<Value>> {
    let operation = SandboxOperation::UploadToAura {
        sandbox_hash_key: request.sandbox_hash_key,
        aura_uri: request.aura_uri,
        aura_password: request.aura_password,
        aura_username: request
            .aura_username
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_AURA_USERNAME.to_string()),
    };
    Ok(Json(state.gateway.dispatch(&identity, operation).await?))
}

pub async fn get_aura_upload_result(
    AuthUser(identity): AuthUser,
    State(state): State<SandboxState>,
    Path(result_id): Path<String>,
) -> Result<Json<Value>> {
    let operation = SandboxOperation::GetAuraUploadResult { result_id };
    Ok(Json(state.gateway.dispatch(&identity, operation).await?))
}
