use serde::{Deserialize, Serialize};

use super::timestamp::Timestamp;

/// Top-level container owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    pub order: i32,
    pub is_archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
