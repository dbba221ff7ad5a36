//! Server side of the contract: one method per procedure.

use super::bookmarks::{CreateBookmarkInput, MoveBookmarkInput, ReorderBookmarksInput, UpdateBookmarkInput};
use super::groups::{CreateGroupInput, ReorderGroupsInput, UpdateGroupInput};
use super::spaces::{CreateSpaceInput, ReorderSpacesInput, UpdateSpaceInput};
use super::sync::{EnsureUserInput, EnsureUserOutput, SyncStatus};
use super::{ByIdInput, Caller, SuccessOutput};
use crate::types::errors::ContractError;
use crate::types::{Bookmark, Group, Space};

/// Handlers a server must provide for every declared path.
///
/// Method signatures mirror the `Input`/`Output` of the matching
/// [`Procedure`](super::Procedure) marker; the RPC dispatcher ties the two
/// together at compile time.
pub trait AppRouter {
    fn spaces_list(&self, caller: &Caller) -> Result<Vec<Space>, ContractError>;
    fn spaces_create(&self, caller: &Caller, input: CreateSpaceInput) -> Result<Space, ContractError>;
    fn spaces_update(&self, caller: &Caller, input: UpdateSpaceInput) -> Result<Space, ContractError>;
    fn spaces_delete(&self, caller: &Caller, input: ByIdInput) -> Result<SuccessOutput, ContractError>;
    fn spaces_reorder(&self, caller: &Caller, input: ReorderSpacesInput) -> Result<SuccessOutput, ContractError>;

    fn groups_list(&self, caller: &Caller) -> Result<Vec<Group>, ContractError>;
    fn groups_create(&self, caller: &Caller, input: CreateGroupInput) -> Result<Group, ContractError>;
    fn groups_update(&self, caller: &Caller, input: UpdateGroupInput) -> Result<Group, ContractError>;
    fn groups_delete(&self, caller: &Caller, input: ByIdInput) -> Result<SuccessOutput, ContractError>;
    fn groups_reorder(&self, caller: &Caller, input: ReorderGroupsInput) -> Result<SuccessOutput, ContractError>;

    fn bookmarks_list(&self, caller: &Caller) -> Result<Vec<Bookmark>, ContractError>;
    fn bookmarks_create(&self, caller: &Caller, input: CreateBookmarkInput) -> Result<Bookmark, ContractError>;
    fn bookmarks_update(&self, caller: &Caller, input: UpdateBookmarkInput) -> Result<Bookmark, ContractError>;
    fn bookmarks_delete(&self, caller: &Caller, input: ByIdInput) -> Result<SuccessOutput, ContractError>;
    fn bookmarks_reorder(&self, caller: &Caller, input: ReorderBookmarksInput) -> Result<SuccessOutput, ContractError>;
    fn bookmarks_move(&self, caller: &Caller, input: MoveBookmarkInput) -> Result<Bookmark, ContractError>;

    fn sync_ensure_user(&self, caller: &Caller, input: EnsureUserInput) -> Result<EnsureUserOutput, ContractError>;
    fn sync_status(&self, caller: &Caller) -> Result<SyncStatus, ContractError>;
}
