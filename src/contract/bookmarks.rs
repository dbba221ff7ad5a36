//! `bookmarks.*` procedures.

use serde::{Deserialize, Serialize};

use super::{validate, ByIdInput, NoInput, SuccessOutput};
use crate::types::errors::ContractError;
use crate::types::{Bookmark, Patch};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookmarkInput {
    pub id: String,
    pub space_id: String,
    pub group_id: String,
    pub title: String,
    pub url: String,
    pub order: i32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub favicon_url: Option<String>,
    #[serde(default)]
    pub is_pinned: bool,
}

impl CreateBookmarkInput {
    pub fn validate(&self) -> Result<(), ContractError> {
        validate::non_empty("id", &self.id)?;
        validate::non_empty("spaceId", &self.space_id)?;
        validate::non_empty("groupId", &self.group_id)?;
        validate::non_empty("title", &self.title)?;
        validate::http_url(&self.url)?;
        validate::order(self.order)
    }
}

/// Sparse update.
///
/// `groupId` without `spaceId` follows the target group's space; the final
/// pair must always agree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookmarkInput {
    pub id: String,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub title: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub url: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub description: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub favicon_url: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub group_id: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub space_id: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub is_pinned: Patch<bool>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub is_archived: Patch<bool>,
}

impl UpdateBookmarkInput {
    pub fn validate(&self) -> Result<(), ContractError> {
        validate::non_empty("id", &self.id)?;
        let required = [
            ("title", &self.title),
            ("groupId", &self.group_id),
            ("spaceId", &self.space_id),
        ];
        for (field, patch) in required {
            match patch {
                Patch::Value(v) => validate::non_empty(field, v)?,
                Patch::Null => {
                    return Err(ContractError::Validation(format!("{} cannot be null", field)))
                }
                Patch::Absent => {}
            }
        }
        match &self.url {
            Patch::Value(url) => validate::http_url(url)?,
            Patch::Null => return Err(ContractError::Validation("url cannot be null".into())),
            Patch::Absent => {}
        }
        for (field, patch) in [("isPinned", &self.is_pinned), ("isArchived", &self.is_archived)] {
            if matches!(patch, Patch::Null) {
                return Err(ContractError::Validation(format!("{} cannot be null", field)));
            }
        }
        Ok(())
    }
}

/// New order of the bookmarks inside one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderBookmarksInput {
    pub group_id: String,
    pub ordered_ids: Vec<String>,
}

impl ReorderBookmarksInput {
    pub fn validate(&self) -> Result<(), ContractError> {
        validate::non_empty("groupId", &self.group_id)?;
        validate::ordered_ids(&self.ordered_ids)
    }
}

/// Atomic re-parent of a bookmark. All three fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveBookmarkInput {
    pub id: String,
    pub group_id: String,
    pub space_id: String,
}

impl MoveBookmarkInput {
    pub fn validate(&self) -> Result<(), ContractError> {
        validate::non_empty("id", &self.id)?;
        validate::non_empty("groupId", &self.group_id)?;
        validate::non_empty("spaceId", &self.space_id)
    }
}

procedure!(List, "bookmarks.list", Query, NoInput => Vec<Bookmark>);
procedure!(Create, "bookmarks.create", Mutate, CreateBookmarkInput => Bookmark);
procedure!(Update, "bookmarks.update", Mutate, UpdateBookmarkInput => Bookmark);
procedure!(Delete, "bookmarks.delete", Mutate, ByIdInput => SuccessOutput);
procedure!(Reorder, "bookmarks.reorder", Mutate, ReorderBookmarksInput => SuccessOutput);
procedure!(
    /// Moves a bookmark to the end of another group, possibly in another space.
    Move, "bookmarks.move", Mutate, MoveBookmarkInput => Bookmark
);
