//! Space Manager for Spacemarks.
//!
//! Implements `SpaceManagerTrait`: CRUD and global reordering of a user's
//! spaces, backed by SQLite via `rusqlite`.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::scope::{self, Table};
use crate::contract::spaces::{CreateSpaceInput, UpdateSpaceInput};
use crate::types::errors::ContractError;
use crate::types::{Space, Timestamp};

const SPACE_COLUMNS: &str =
    "id, user_id, name, icon, color, sort_order, is_archived, created_at, updated_at";

/// Trait defining space management operations. Every call is scoped to `user_id`.
pub trait SpaceManagerTrait {
    fn list_spaces(&self, user_id: &str) -> Result<Vec<Space>, ContractError>;
    fn get_space(&self, user_id: &str, id: &str) -> Result<Space, ContractError>;
    fn create_space(&mut self, user_id: &str, input: &CreateSpaceInput) -> Result<Space, ContractError>;
    fn update_space(&mut self, user_id: &str, input: UpdateSpaceInput) -> Result<Space, ContractError>;
    /// Hard delete. Groups and bookmarks of the space go with it.
    fn delete_space(&mut self, user_id: &str, id: &str) -> Result<(), ContractError>;
    fn reorder_spaces(&mut self, user_id: &str, ordered_ids: &[String]) -> Result<(), ContractError>;
}

/// Space manager backed by a SQLite connection.
pub struct SpaceManager<'a> {
    conn: &'a Connection,
}

impl<'a> SpaceManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn row_to_space(row: &rusqlite::Row) -> rusqlite::Result<Space> {
        Ok(Space {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            icon: row.get(3)?,
            color: row.get(4)?,
            order: row.get(5)?,
            is_archived: row.get(6)?,
            created_at: Timestamp::from_millis(row.get(7)?),
            updated_at: Timestamp::from_millis(row.get(8)?),
        })
    }

    /// Ids of the user's spaces, split into (active, archived).
    fn member_ids(&self, user_id: &str) -> Result<(Vec<String>, Vec<String>), ContractError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, is_archived FROM spaces WHERE user_id = ?1")?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?))
        })?;
        let mut active = Vec::new();
        let mut archived = Vec::new();
        for row in rows {
            let (id, is_archived) = row?;
            if is_archived {
                archived.push(id);
            } else {
                active.push(id);
            }
        }
        Ok((active, archived))
    }
}

impl<'a> SpaceManagerTrait for SpaceManager<'a> {
    fn list_spaces(&self, user_id: &str) -> Result<Vec<Space>, ContractError> {
        let sql = format!(
            "SELECT {} FROM spaces WHERE user_id = ?1 ORDER BY sort_order, created_at, id",
            SPACE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id], Self::row_to_space)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn get_space(&self, user_id: &str, id: &str) -> Result<Space, ContractError> {
        let sql = format!("SELECT {} FROM spaces WHERE id = ?1", SPACE_COLUMNS);
        let space = self
            .conn
            .query_row(&sql, params![id], Self::row_to_space)
            .optional()?
            .ok_or_else(|| ContractError::NotFound(format!("Space {}", id)))?;
        if space.user_id != user_id {
            return Err(ContractError::Forbidden(format!(
                "Space {} belongs to another user",
                id
            )));
        }
        Ok(space)
    }

    fn create_space(&mut self, user_id: &str, input: &CreateSpaceInput) -> Result<Space, ContractError> {
        input.validate()?;
        scope::ensure_id_free(self.conn, Table::Spaces, &input.id)?;

        let now = Timestamp::now().as_millis();
        self.conn.execute(
            "INSERT INTO spaces (id, user_id, name, icon, color, sort_order, is_archived, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?7)",
            params![input.id, user_id, input.name, input.icon, input.color, input.order, now],
        )?;
        debug!(user_id, space_id = %input.id, "space created");
        self.get_space(user_id, &input.id)
    }

    fn update_space(&mut self, user_id: &str, input: UpdateSpaceInput) -> Result<Space, ContractError> {
        input.validate()?;
        let current = self.get_space(user_id, &input.id)?;

        let name = input
            .name
            .required("name")
            .map_err(ContractError::Validation)?
            .unwrap_or(current.name);
        let is_archived = input
            .is_archived
            .required("isArchived")
            .map_err(ContractError::Validation)?
            .unwrap_or(current.is_archived);
        let icon = input.icon.apply_to(current.icon);
        let color = input.color.apply_to(current.color);

        self.conn.execute(
            "UPDATE spaces SET name = ?1, icon = ?2, color = ?3, is_archived = ?4, updated_at = ?5 \
             WHERE id = ?6",
            params![name, icon, color, is_archived, Timestamp::now().as_millis(), input.id],
        )?;
        debug!(user_id, space_id = %input.id, "space updated");
        self.get_space(user_id, &input.id)
    }

    fn delete_space(&mut self, user_id: &str, id: &str) -> Result<(), ContractError> {
        scope::ensure_owned(self.conn, Table::Spaces, id, user_id)?;
        // Cascades through bookmark_groups and bookmarks via ON DELETE CASCADE
        self.conn
            .execute("DELETE FROM spaces WHERE id = ?1", params![id])?;
        debug!(user_id, space_id = %id, "space deleted");
        Ok(())
    }

    fn reorder_spaces(&mut self, user_id: &str, ordered_ids: &[String]) -> Result<(), ContractError> {
        // Archived spaces sit outside the ordering and may be left out
        let (active, archived) = self.member_ids(user_id)?;
        scope::check_partial_reorder(
            self.conn,
            Table::Spaces,
            user_id,
            &active,
            &archived,
            ordered_ids,
        )?;
        scope::apply_order(self.conn, Table::Spaces, ordered_ids, Timestamp::now().as_millis())?;
        debug!(user_id, count = ordered_ids.len(), "spaces reordered");
        Ok(())
    }
}
