use serde::{Deserialize, Serialize};

use super::timestamp::Timestamp;

/// Represents a saved bookmark.
///
/// `space_id` always equals the space of the group referenced by `group_id`.
/// `order` is scoped to `group_id`; pinning does not change that scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub user_id: String,
    pub space_id: String,
    pub group_id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub favicon_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub order: i32,
    pub is_pinned: bool,
    pub is_archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
