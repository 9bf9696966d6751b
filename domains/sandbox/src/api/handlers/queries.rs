//! Cypher query handlers
//!
//! - GET  /query/schema?hash_key=  : Labels, attributes and relationships
//! - POST /query/read              : Read-only statement
//! - POST /query/write             : Statement that may write

use axum::{extract::State, Json};
use sandgate_auth::AuthUser;
use sandgate_common::{Result, ValidatedJson, ValidatedQuery};
use serde::Deserialize;
use serde_json::{Map, Value};
use validator::Validate;

use crate::api::middleware::SandboxState;
use crate::operations::SandboxOperation;

#[derive(Debug, Deserialize, Validate)]
pub struct SchemaQuery {
    #[validate(length(min = 1))]
    pub hash_key: String,
}

/// Body shared by read and write queries
#[derive(Debug, Deserialize, Validate)]
pub struct CypherQueryRequest {
    #[validate(length(min = 1))]
    pub hash_key: String,
    #[validate(length(min = 1))]
    pub query: String,
    pub params: Option<Map<String, Value>>,
}

pub async fn get_schema(
    AuthUser(identity): AuthUser,
    State(state): State<SandboxState>,
    ValidatedQuery(query): ValidatedQuery<SchemaQuery>,
) -> Result<Json<Value>> {
    let operation = SandboxOperation::GetSchema {
        hash_key: query.hash_key,
    };
    Ok(Json(state.gateway.dispatch(&identity, operation).await?))
}

pub async fn read_query(
    AuthUser(identity): AuthUser,
    State(state): State<SandboxState>,
    ValidatedJson(request): ValidatedJson<CypherQueryRequest>,
) -> Result<Json<Value>> {
    let operation = SandboxOperation::ReadQuery {
        hash_key: request.hash_key,
        query: request.query,
        params: request.params,
    };
    Ok(Json(state.gateway.dispatch(&identity, operation).await?))
}

pub async fn write_query(
    AuthUser(identity): AuthUser,
    State(state): State<SandboxState>,
    ValidatedJson(request): ValidatedJson<CypherQueryRequest>,
) -> Result<Json<Value>> {
    let operation = SandboxOperation::WriteQuery {
        hash_key: request.hash_key,
        query: request.query,
        params: request.params,
    };
    Ok(Json(state.gateway.dispatch(&identity, operation).await?))
}
