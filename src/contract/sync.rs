//! `sync.*` procedures: user provisioning and first-run detection.

use serde::{Deserialize, Serialize};

use super::NoInput;

/// Profile fields refreshed on the caller's user record when supplied.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsureUserInput {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsureUserOutput {
    pub user_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    /// Whether the server already holds spaces, groups or bookmarks for the caller.
    pub has_data: bool,
}

procedure!(
    /// Creates or fetches the caller's user record. Idempotent per caller.
    EnsureUser, "sync.ensureUser", Mutate, EnsureUserInput => EnsureUserOutput
);
procedure!(Status, "sync.status", Query, NoInput => SyncStatus);
