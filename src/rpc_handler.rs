//! RPC method handler for the Spacemarks JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested independently.
//! [`dispatch`] decodes the typed input of a procedure, calls the matching
//! [`AppRouter`] method and encodes the typed output.
//!
//! Wire format, one JSON object per line:
//!
//! ```text
//! {"id":1,"method":"spaces.create","type":"mutation","caller":"auth|42","params":{...}}
//! {"id":1,"result":{...}}
//! {"id":1,"error":{"code":"NOT_FOUND","message":"..."}}
//! ```

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::app::App;
use crate::contract::{self, bookmarks, groups, spaces, sync, AppRouter, Caller, Procedure, ProcedureKind};
use crate::types::errors::ContractError;

/// Code for lines that are not valid requests.
pub const PARSE_ERROR: &str = "PARSE_ERROR";
/// Code for requests rejected by the rate limiter.
pub const TOO_MANY_REQUESTS: &str = "TOO_MANY_REQUESTS";

/// A single call on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    /// Optional kind assertion; must match the procedure when present.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ProcedureKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: String,
    pub message: String,
}

impl From<&ContractError> for RpcError {
    fn from(e: &ContractError) -> Self {
        Self {
            code: e.code().to_string(),
            message: e.message().to_string(),
        }
    }
}

/// The answer to one request: exactly one of `result` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn ok(id: Value, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: Value, code: &str, message: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(RpcError {
                code: code.to_string(),
                message: message.into(),
            }),
        }
    }

    fn from_result(id: Value, result: Result<Value, ContractError>) -> Self {
        match result {
            Ok(value) => Self::ok(id, value),
            Err(e) => Self {
                id,
                result: None,
                error: Some(RpcError::from(&e)),
            },
        }
    }
}

/// Decodes `params` as `P::Input`, runs `handler` and encodes `P::Output`.
fn invoke<P: Procedure>(
    params: &Value,
    handler: impl FnOnce(P::Input) -> Result<P::Output, ContractError>,
) -> Result<Value, ContractError> {
    let params = match params {
        Value::Null => Value::Object(Map::new()),
        other => other.clone(),
    };
    let input: P::Input = serde_json::from_value(params)
        .map_err(|e| ContractError::Validation(format!("invalid input for {}: {}", P::PATH, e)))?;
    let output = handler(input)?;
    serde_json::to_value(output)
        .map_err(|e| ContractError::Database(format!("failed to encode {} output: {}", P::PATH, e)))
}

/// Routes a call to the matching [`AppRouter`] method.
pub fn dispatch<R: AppRouter>(
    router: &R,
    caller: &Caller,
    method: &str,
    params: &Value,
) -> Result<Value, ContractError> {
    match method {
        // ─── Spaces ───
        "spaces.list" => invoke::<spaces::List>(params, |_| router.spaces_list(caller)),
        "spaces.create" => invoke::<spaces::Create>(params, |i| router.spaces_create(caller, i)),
        "spaces.update" => invoke::<spaces::Update>(params, |i| router.spaces_update(caller, i)),
        "spaces.delete" => invoke::<spaces::Delete>(params, |i| router.spaces_delete(caller, i)),
        "spaces.reorder" => invoke::<spaces::Reorder>(params, |i| router.spaces_reorder(caller, i)),

        // ─── Groups ───
        "groups.list" => invoke::<groups::List>(params, |_| router.groups_list(caller)),
        "groups.create" => invoke::<groups::Create>(params, |i| router.groups_create(caller, i)),
        "groups.update" => invoke::<groups::Update>(params, |i| router.groups_update(caller, i)),
        "groups.delete" => invoke::<groups::Delete>(params, |i| router.groups_delete(caller, i)),
        "groups.reorder" => invoke::<groups::Reorder>(params, |i| router.groups_reorder(caller, i)),

        // ─── Bookmarks ───
        "bookmarks.list" => invoke::<bookmarks::List>(params, |_| router.bookmarks_list(caller)),
        "bookmarks.create" => {
            invoke::<bookmarks::Create>(params, |i| router.bookmarks_create(caller, i))
        }
        "bookmarks.update" => {
            invoke::<bookmarks::Update>(params, |i| router.bookmarks_update(caller, i))
        }
        "bookmarks.delete" => {
            invoke::<bookmarks::Delete>(params, |i| router.bookmarks_delete(caller, i))
        }
        "bookmarks.reorder" => {
            invoke::<bookmarks::Reorder>(params, |i| router.bookmarks_reorder(caller, i))
        }
        "bookmarks.move" => invoke::<bookmarks::Move>(params, |i| router.bookmarks_move(caller, i)),

        // ─── Sync ───
        "sync.ensureUser" => {
            invoke::<sync::EnsureUser>(params, |i| router.sync_ensure_user(caller, i))
        }
        "sync.status" => invoke::<sync::Status>(params, |_| router.sync_status(caller)),

        _ => Err(ContractError::UnknownProcedure(method.to_string())),
    }
}

/// Locks the app and dispatches one call.
pub fn handle_method(
    app: &Mutex<App>,
    caller: &Caller,
    method: &str,
    params: &Value,
) -> Result<Value, ContractError> {
    let a = app.lock().map_err(|e| ContractError::Database(e.to_string()))?;
    dispatch(&*a, caller, method, params)
}

/// Validates the envelope of a request and dispatches it.
pub fn handle_request(app: &Mutex<App>, request: &RpcRequest) -> RpcResponse {
    let id = request.id.clone();
    let result = check_envelope(request).and_then(|caller| {
        debug!(method = %request.method, "dispatching");
        handle_method(app, &caller, &request.method, &request.params)
    });
    if let Err(e) = &result {
        warn!(method = %request.method, code = e.code(), error = %e, "request failed");
    }
    RpcResponse::from_result(id, result)
}

/// Parses one protocol line and handles it.
pub fn handle_line(app: &Mutex<App>, line: &str) -> RpcResponse {
    match serde_json::from_str::<RpcRequest>(line) {
        Ok(request) => handle_request(app, &request),
        Err(e) => {
            // Keep the id if the line was an object with one
            let id = serde_json::from_str::<Value>(line)
                .ok()
                .and_then(|v| v.get("id").cloned())
                .unwrap_or(Value::Null);
            RpcResponse::err(id, PARSE_ERROR, format!("parse error: {}", e))
        }
    }
}

fn check_envelope(request: &RpcRequest) -> Result<Caller, ContractError> {
    let route = contract::route(&request.method)
        .ok_or_else(|| ContractError::UnknownProcedure(request.method.clone()))?;
    if let Some(kind) = request.kind {
        if kind != route.kind {
            return Err(ContractError::Validation(format!(
                "{} is a {}, not a {}",
                route.path, route.kind, kind
            )));
        }
    }
    match request.caller.as_deref().map(str::trim) {
        Some(subject) if !subject.is_empty() => Ok(Caller::new(subject)),
        _ => Err(ContractError::Unauthorized("missing caller".to_string())),
    }
}
