//! `spaces.*` procedures.

use serde::{Deserialize, Serialize};

use super::{validate, ByIdInput, NoInput, SuccessOutput};
use crate::types::errors::ContractError;
use crate::types::{Patch, Space};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpaceInput {
    pub id: String,
    pub name: String,
    pub order: i32,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl CreateSpaceInput {
    pub fn validate(&self) -> Result<(), ContractError> {
        validate::non_empty("id", &self.id)?;
        validate::non_empty("name", &self.name)?;
        validate::order(self.order)
    }
}

/// Sparse update; only `id` is required.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSpaceInput {
    pub id: String,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub icon: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub color: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub is_archived: Patch<bool>,
}

impl UpdateSpaceInput {
    pub fn validate(&self) -> Result<(), ContractError> {
        validate::non_empty("id", &self.id)?;
        match &self.name {
            Patch::Value(name) => validate::non_empty("name", name)?,
            Patch::Null => return Err(ContractError::Validation("name cannot be null".into())),
            Patch::Absent => {}
        }
        if matches!(self.is_archived, Patch::Null) {
            return Err(ContractError::Validation("isArchived cannot be null".into()));
        }
        Ok(())
    }
}

/// Full new order of the caller's spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderSpacesInput {
    pub ordered_ids: Vec<String>,
}

impl ReorderSpacesInput {
    pub fn validate(&self) -> Result<(), ContractError> {
        validate::ordered_ids(&self.ordered_ids)
    }
}

procedure!(
    /// All of the caller's spaces, ordered.
    List, "spaces.list", Query, NoInput => Vec<Space>
);
procedure!(Create, "spaces.create", Mutate, CreateSpaceInput => Space);
procedure!(Update, "spaces.update", Mutate, UpdateSpaceInput => Space);
procedure!(
    /// Hard delete; cascades to the space's groups and bookmarks.
    Delete, "spaces.delete", Mutate, ByIdInput => SuccessOutput
);
procedure!(Reorder, "spaces.reorder", Mutate, ReorderSpacesInput => SuccessOutput);
