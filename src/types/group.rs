use serde::{Deserialize, Serialize};

use super::timestamp::Timestamp;

/// Container of bookmarks inside a space. `order` is scoped to `space_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub user_id: String,
    pub space_id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub order: i32,
    pub is_archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
