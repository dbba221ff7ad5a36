//! `groups.*` procedures.

use serde::{Deserialize, Serialize};

use super::{validate, ByIdInput, NoInput, SuccessOutput};
use crate::types::errors::ContractError;
use crate::types::{Group, Patch};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupInput {
    pub id: String,
    pub space_id: String,
    pub name: String,
    pub order: i32,
    #[serde(default)]
    pub icon: Option<String>,
}

impl CreateGroupInput {
    pub fn validate(&self) -> Result<(), ContractError> {
        validate::non_empty("id", &self.id)?;
        validate::non_empty("spaceId", &self.space_id)?;
        validate::non_empty("name", &self.name)?;
        validate::order(self.order)
    }
}

/// Sparse update. A new `spaceId` re-parents the group together with its bookmarks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupInput {
    pub id: String,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub icon: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub space_id: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub is_archived: Patch<bool>,
}

impl UpdateGroupInput {
    pub fn validate(&self) -> Result<(), ContractError> {
        validate::non_empty("id", &self.id)?;
        for (field, patch) in [("name", &self.name), ("spaceId", &self.space_id)] {
            match patch {
                Patch::Value(v) => validate::non_empty(field, v)?,
                Patch::Null => {
                    return Err(ContractError::Validation(format!("{} cannot be null", field)))
                }
                Patch::Absent => {}
            }
        }
        if matches!(self.is_archived, Patch::Null) {
            return Err(ContractError::Validation("isArchived cannot be null".into()));
        }
        Ok(())
    }
}

/// New order of the groups inside one space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderGroupsInput {
    pub space_id: String,
    pub ordered_ids: Vec<String>,
}

impl ReorderGroupsInput {
    pub fn validate(&self) -> Result<(), ContractError> {
        validate::non_empty("spaceId", &self.space_id)?;
        validate::ordered_ids(&self.ordered_ids)
    }
}

procedure!(List, "groups.list", Query, NoInput => Vec<Group>);
procedure!(Create, "groups.create", Mutate, CreateGroupInput => Group);
procedure!(Update, "groups.update", Mutate, UpdateGroupInput => Group);
procedure!(Delete, "groups.delete", Mutate, ByIdInput => SuccessOutput);
procedure!(Reorder, "groups.reorder", Mutate, ReorderGroupsInput => SuccessOutput);
