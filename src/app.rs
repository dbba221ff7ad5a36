//! App Core for Spacemarks.
//!
//! Owns the database and settings, and implements [`AppRouter`] by building
//! managers on demand over the shared connection.

use tracing::info;

use crate::contract::bookmarks::{CreateBookmarkInput, MoveBookmarkInput, ReorderBookmarksInput, UpdateBookmarkInput};
use crate::contract::groups::{CreateGroupInput, ReorderGroupsInput, UpdateGroupInput};
use crate::contract::spaces::{CreateSpaceInput, ReorderSpacesInput, UpdateSpaceInput};
use crate::contract::sync::{EnsureUserInput, EnsureUserOutput, SyncStatus};
use crate::contract::{AppRouter, ByIdInput, Caller, SuccessOutput};
use crate::database::connection::Database;
use crate::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use crate::managers::group_manager::{GroupManager, GroupManagerTrait};
use crate::managers::space_manager::{SpaceManager, SpaceManagerTrait};
use crate::managers::user_manager::{UserManager, UserManagerTrait};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::errors::ContractError;
use crate::types::{Bookmark, Group, Space};

/// Central application struct.
///
/// Managers are not stored because they borrow `&Connection` with a lifetime;
/// they are created per call via `db.connection()`.
pub struct App {
    pub db: Database,
    pub settings_engine: SettingsEngine,
}

impl App {
    /// Opens the database at `db_path` with default settings.
    pub fn new(db_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Database::open(db_path)?;
        Ok(Self {
            db,
            settings_engine: SettingsEngine::new(None),
        })
    }

    /// Loads settings from `engine`, then opens the database they point to.
    pub fn from_settings(mut engine: SettingsEngine) -> Result<Self, Box<dyn std::error::Error>> {
        engine.load()?;
        let db_path = engine.database_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::open(&db_path)?;
        info!(path = %db_path.display(), "app initialized");
        Ok(Self {
            db,
            settings_engine: engine,
        })
    }

    /// In-memory database, for tests and embedding.
    pub fn open_in_memory() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            db: Database::open_in_memory()?,
            settings_engine: SettingsEngine::new(None),
        })
    }

    /// Maps the caller to its user id. Callers must have run `sync.ensureUser` first.
    fn user_id(&self, caller: &Caller) -> Result<String, ContractError> {
        if caller.subject.trim().is_empty() {
            return Err(ContractError::Unauthorized("missing caller".to_string()));
        }
        UserManager::new(self.db.connection())
            .find_by_subject(&caller.subject)?
            .map(|u| u.id)
            .ok_or_else(|| {
                ContractError::Unauthorized(format!(
                    "no user record for {}; call sync.ensureUser first",
                    caller.subject
                ))
            })
    }
}

impl AppRouter for App {
    fn spaces_list(&self, caller: &Caller) -> Result<Vec<Space>, ContractError> {
        let user_id = self.user_id(caller)?;
        SpaceManager::new(self.db.connection()).list_spaces(&user_id)
    }

    fn spaces_create(&self, caller: &Caller, input: CreateSpaceInput) -> Result<Space, ContractError> {
        let user_id = self.user_id(caller)?;
        SpaceManager::new(self.db.connection()).create_space(&user_id, &input)
    }

    fn spaces_update(&self, caller: &Caller, input: UpdateSpaceInput) -> Result<Space, ContractError> {
        let user_id = self.user_id(caller)?;
        SpaceManager::new(self.db.connection()).update_space(&user_id, input)
    }

    fn spaces_delete(&self, caller: &Caller, input: ByIdInput) -> Result<SuccessOutput, ContractError> {
        let user_id = self.user_id(caller)?;
        SpaceManager::new(self.db.connection()).delete_space(&user_id, &input.id)?;
        Ok(SuccessOutput::OK)
    }

    fn spaces_reorder(&self, caller: &Caller, input: ReorderSpacesInput) -> Result<SuccessOutput, ContractError> {
        input.validate()?;
        let user_id = self.user_id(caller)?;
        SpaceManager::new(self.db.connection()).reorder_spaces(&user_id, &input.ordered_ids)?;
        Ok(SuccessOutput::OK)
    }

    fn groups_list(&self, caller: &Caller) -> Result<Vec<Group>, ContractError> {
        let user_id = self.user_id(caller)?;
        GroupManager::new(self.db.connection()).list_groups(&user_id)
    }

    fn groups_create(&self, caller: &Caller, input: CreateGroupInput) -> Result<Group, ContractError> {
        let user_id = self.user_id(caller)?;
        GroupManager::new(self.db.connection()).create_group(&user_id, &input)
    }

    fn groups_update(&self, caller: &Caller, input: UpdateGroupInput) -> Result<Group, ContractError> {
        let user_id = self.user_id(caller)?;
        GroupManager::new(self.db.connection()).update_group(&user_id, input)
    }

    fn groups_delete(&self, caller: &Caller, input: ByIdInput) -> Result<SuccessOutput, ContractError> {
        let user_id = self.user_id(caller)?;
        GroupManager::new(self.db.connection()).delete_group(&user_id, &input.id)?;
        Ok(SuccessOutput::OK)
    }

    fn groups_reorder(&self, caller: &Caller, input: ReorderGroupsInput) -> Result<SuccessOutput, ContractError> {
        input.validate()?;
        let user_id = self.user_id(caller)?;
        GroupManager::new(self.db.connection()).reorder_groups(&user_id, &input.space_id, &input.ordered_ids)?;
        Ok(SuccessOutput::OK)
    }

    fn bookmarks_list(&self, caller: &Caller) -> Result<Vec<Bookmark>, ContractError> {
        let user_id = self.user_id(caller)?;
        BookmarkManager::new(self.db.connection()).list_bookmarks(&user_id)
    }

    fn bookmarks_create(&self, caller: &Caller, input: CreateBookmarkInput) -> Result<Bookmark, ContractError> {
        let user_id = self.user_id(caller)?;
        BookmarkManager::new(self.db.connection()).create_bookmark(&user_id, &input)
    }

    fn bookmarks_update(&self, caller: &Caller, input: UpdateBookmarkInput) -> Result<Bookmark, ContractError> {
        let user_id = self.user_id(caller)?;
        BookmarkManager::new(self.db.connection()).update_bookmark(&user_id, input)
    }

    fn bookmarks_delete(&self, caller: &Caller, input: ByIdInput) -> Result<SuccessOutput, ContractError> {
        let user_id = self.user_id(caller)?;
        BookmarkManager::new(self.db.connection()).delete_bookmark(&user_id, &input.id)?;
        Ok(SuccessOutput::OK)
    }

    fn bookmarks_reorder(&self, caller: &Caller, input: ReorderBookmarksInput) -> Result<SuccessOutput, ContractError> {
        input.validate()?;
        let user_id = self.user_id(caller)?;
        BookmarkManager::new(self.db.connection()).reorder_bookmarks(&user_id, &input.group_id, &input.ordered_ids)?;
        Ok(SuccessOutput::OK)
    }

    fn bookmarks_move(&self, caller: &Caller, input: MoveBookmarkInput) -> Result<Bookmark, ContractError> {
        let user_id = self.user_id(caller)?;
        BookmarkManager::new(self.db.connection()).move_bookmark(&user_id, &input)
    }

    fn sync_ensure_user(&self, caller: &Caller, input: EnsureUserInput) -> Result<EnsureUserOutput, ContractError> {
        let user = UserManager::new(self.db.connection()).ensure_user(&caller.subject, &input)?;
        Ok(EnsureUserOutput { user_id: user.id })
    }

    fn sync_status(&self, caller: &Caller) -> Result<SyncStatus, ContractError> {
        let users = UserManager::new(self.db.connection());
        let has_data = match users.find_by_subject(&caller.subject)? {
            Some(user) => users.has_data(&user.id)?,
            None => false,
        };
        Ok(SyncStatus { has_data })
    }
}
