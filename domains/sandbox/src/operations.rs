//! Sandbox operations and their backend calls
//!
//! Every operation the gateway can perform is a variant here. `to_call` is
//! an exhaustive match, so an operation without a backend mapping does not
//! compile.

use serde_json::{json, Map, Value};

use sandgate_sandbox::BackendCall;

/// Username used for Aura uploads when the caller gives none
pub const DEFAULT_AURA_USERNAME: &str = "neo4j";

/// Cypher returning node labels with their attributes and relationships
pub const SCHEMA_QUERY: &str = "call apoc.meta.data() yield label, property, type, other, unique, index, elementType \
where elementType = 'node' and not label starts with '_' \
with label, collect(case when type <> 'RELATIONSHIP' \
then [property, type + case when unique then ' unique' else '' end + \
case when index then ' indexed' else '' end] end) as attributes, \
collect(case when type = 'RELATIONSHIP' then [property, head(other)] end) as relationships \
return label, apoc.map.fromPairs(attributes) as attributes, \
apoc.map.fromPairs(relationships) as relationships";

#[derive(Debug, Clone, PartialEq)]
pub enum SandboxOperation {
    ListSandboxes {
        timezone: Option<String>,
    },
    StartSandbox {
        usecase: String,
    },
    StopSandbox {
        sandbox_hash_key: String,
    },
    /// Without a key, every sandbox of the caller is extended
    ExtendSandbox {
        sandbox_hash_key: Option<String>,
    },
    GetSandboxDetails {
        sandbox_hash_key: String,
        verify_connect: bool,
    },
    RequestBackup {
        sandbox_hash_key: String,
    },
    GetBackupResult {
        result_id: String,
    },
    ListBackups {
        sandbox_hash_key: String,
    },
    GetBackupDownloadUrl {
        sandbox_hash_key: String,
        key: String,
    },
    UploadToAura {
        sandbox_hash_key: String,
        aura_uri: String,
        aura_password: String,
        aura_username: String,
    },
    GetAuraUploadResult {
        result_id: String,
    },
    GetSchema {
        hash_key: String,
    },
    ReadQuery {
        hash_key: String,
        query: String,
        params: Option<Map<String, Value>>,
    },
    WriteQuery {
        hash_key: String,
        query: String,
        params: Option<Map<String, Value>>,
    },
}

impl SandboxOperation {
    /// Stable operation name for logs
    pub fn name(&self) -> &'static str {
        match self {
            SandboxOperation::ListSandboxes { .. } => "list_sandboxes_for_user",
            SandboxOperation::StartSandbox { .. } => "start_sandbox",
            SandboxOperation::StopSandbox { .. } => "stop_sandbox",
            SandboxOperation::ExtendSandbox { .. } => "extend_sandbox",
            SandboxOperation::GetSandboxDetails { .. } => "get_sandbox_details",
            SandboxOperation::RequestBackup { .. } => "request_backup",
            SandboxOperation::GetBackupResult { .. } => "get_backup_result",
            SandboxOperation::ListBackups { .. } => "list_backups",
            SandboxOperation::GetBackupDownloadUrl { .. } => "get_backup_download_url",
            SandboxOperation::UploadToAura { .. } => "upload_to_aura",
            SandboxOperation::GetAuraUploadResult { .. } => "get_aura_upload_result",
            SandboxOperation::GetSchema { .. } => "get_schema",
            SandboxOperation::ReadQuery { .. } => "read_query",
            SandboxOperation::WriteQuery { .. } => "write_query",
        }
    }

    /// Whether the operation changes backend state.
    ///
    /// Retries of these may execute more than once at the backend.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            SandboxOperation::StartSandbox { .. }
                | SandboxOperation::StopSandbox { .. }
                | SandboxOperation::ExtendSandbox { .. }
                | SandboxOperation::RequestBackup { .. }
                | SandboxOperation::UploadToAura { .. }
                | SandboxOperation::WriteQuery { .. }
        )
    }

    pub fn to_call(&self) -> BackendCall {
        match self {
            SandboxOperation::ListSandboxes { timezone } => {
                let call = BackendCall::get(["SandboxGetRunningInstancesForUser"]);
                match timezone {
                    Some(tz) => call.query("timezone", tz.as_str()),
                    None => call,
                }
            }
            SandboxOperation::StartSandbox { usecase } => {
                BackendCall::post(["SandboxRunInstance"]).json(json!({ "usecase": usecase }))
            }
            SandboxOperation::StopSandbox { sandbox_hash_key } => {
                BackendCall::post(["SandboxStopInstance"])
                    .json(json!({ "sandboxHashKey": sandbox_hash_key }))
            }
            SandboxOperation::ExtendSandbox { sandbox_hash_key } => {
                let body = match sandbox_hash_key.as_deref() {
                    Some(key) if !key.is_empty() => json!({ "sandboxHashKey": key }),
                    _ => json!({}),
                };
                BackendCall::post(["SandboxExtend"]).json(body)
            }
            SandboxOperation::GetSandboxDetails {
                sandbox_hash_key,
                verify_connect,
            } => BackendCall::get(["SandboxAuthdGetInstanceByHashKey"])
                .query("sandboxHashKey", sandbox_hash_key.as_str())
                .query("verifyConnect", verify_connect.to_string()),
            SandboxOperation::RequestBackup { sandbox_hash_key } => {
                BackendCall::post(["SandboxBackup", "request", sandbox_hash_key.as_str()])
            }
            SandboxOperation::GetBackupResult { result_id } => {
                BackendCall::get(["SandboxBackup", "result", result_id.as_str()])
            }
            SandboxOperation::ListBackups { sandbox_hash_key } => {
                BackendCall::get(["SandboxBackup", sandbox_hash_key.as_str()])
            }
            SandboxOperation::GetBackupDownloadUrl {
                sandbox_hash_key,
                key,
            } => BackendCall::post(["SandboxBackup", sandbox_hash_key.as_str()])
                .json(json!({ "key": key })),
            SandboxOperation::UploadToAura {
                sandbox_hash_key,
                aura_uri,
                aura_password,
                aura_username,
            } => BackendCall::post(["SandboxAuraUpload", "request", sandbox_hash_key.as_str()])
                .json(json!({
                    "aura_uri": aura_uri,
                    "aura_password": aura_password,
                    "aura_username": aura_username,
                })),
            SandboxOperation::GetAuraUploadResult { result_id } => {
                BackendCall::get(["SandboxAuraUpload", "result", result_id.as_str()])
            }
            SandboxOperation::GetSchema { hash_key } => run_query(hash_key, SCHEMA_QUERY, None, true),
            SandboxOperation::ReadQuery {
                hash_key,
                query,
                params,
            } => run_query(hash_key, query, params.as_ref(), true),
            SandboxOperation::WriteQuery {
                hash_key,
                query,
                params,
            } => run_query(hash_key, query, params.as_ref(), false),
        }
    }

    /// Shape a successful backend result into the response body.
    ///
    /// Calls without a body answer `{}`; the sandbox listing is wrapped.
    pub fn shape(&self, result: Option<Value>) -> Value {
        match self {
            SandboxOperation::ListSandboxes { .. } => {
                json!({ "sandboxes": result.unwrap_or(Value::Null) })
            }
            _ => result.unwrap_or_else(|| json!({})),
        }
    }
}

fn run_query(
    hash_key: &str,
    statement: &str,
    params: Option<&Map<String, Value>>,
    read_only: bool,
) -> BackendCall {
    let mut body = json!({
        "hash_key": hash_key,
        "statement": statement,
        "params": params,
    });
    if read_only {
        body["accessMode"] = json!("Read");
    }
    BackendCall::post(["SandboxRunQuery"]).json(body)
}
