//! Group Manager for Spacemarks.
//!
//! Implements `GroupManagerTrait`: CRUD, re-parenting between spaces and
//! per-space reordering of groups.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::scope::{self, Table};
use crate::contract::groups::{CreateGroupInput, UpdateGroupInput};
use crate::types::errors::ContractError;
use crate::types::{Group, Timestamp};

const GROUP_COLUMNS: &str =
    "id, user_id, space_id, name, icon, sort_order, is_archived, created_at, updated_at";

/// Trait defining group management operations. Every call is scoped to `user_id`.
pub trait GroupManagerTrait {
    fn list_groups(&self, user_id: &str) -> Result<Vec<Group>, ContractError>;
    fn list_groups_in_space(&self, user_id: &str, space_id: &str) -> Result<Vec<Group>, ContractError>;
    fn get_group(&self, user_id: &str, id: &str) -> Result<Group, ContractError>;
    fn create_group(&mut self, user_id: &str, input: &CreateGroupInput) -> Result<Group, ContractError>;
    /// Applies a sparse update. Moving to another space appends the group at the
    /// end of that space and carries its bookmarks along.
    fn update_group(&mut self, user_id: &str, input: UpdateGroupInput) -> Result<Group, ContractError>;
    fn delete_group(&mut self, user_id: &str, id: &str) -> Result<(), ContractError>;
    fn reorder_groups(&mut self, user_id: &str, space_id: &str, ordered_ids: &[String]) -> Result<(), ContractError>;
}

/// Group manager backed by a SQLite connection.
pub struct GroupManager<'a> {
    conn: &'a Connection,
}

impl<'a> GroupManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn row_to_group(row: &rusqlite::Row) -> rusqlite::Result<Group> {
        Ok(Group {
            id: row.get(0)?,
            user_id: row.get(1)?,
            space_id: row.get(2)?,
            name: row.get(3)?,
            icon: row.get(4)?,
            order: row.get(5)?,
            is_archived: row.get(6)?,
            created_at: Timestamp::from_millis(row.get(7)?),
            updated_at: Timestamp::from_millis(row.get(8)?),
        })
    }

    fn query_groups(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<Group>, ContractError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, Self::row_to_group)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

impl<'a> GroupManagerTrait for GroupManager<'a> {
    fn list_groups(&self, user_id: &str) -> Result<Vec<Group>, ContractError> {
        let sql = format!(
            "SELECT {} FROM bookmark_groups WHERE user_id = ?1 \
             ORDER BY space_id, sort_order, created_at, id",
            GROUP_COLUMNS
        );
        self.query_groups(&sql, params![user_id])
    }

    fn list_groups_in_space(&self, user_id: &str, space_id: &str) -> Result<Vec<Group>, ContractError> {
        scope::ensure_owned(self.conn, Table::Spaces, space_id, user_id)?;
        let sql = format!(
            "SELECT {} FROM bookmark_groups WHERE user_id = ?1 AND space_id = ?2 \
             ORDER BY sort_order, created_at, id",
            GROUP_COLUMNS
        );
        self.query_groups(&sql, params![user_id, space_id])
    }

    fn get_group(&self, user_id: &str, id: &str) -> Result<Group, ContractError> {
        let sql = format!("SELECT {} FROM bookmark_groups WHERE id = ?1", GROUP_COLUMNS);
        let group = self
            .conn
            .query_row(&sql, params![id], Self::row_to_group)
            .optional()?
            .ok_or_else(|| ContractError::NotFound(format!("Group {}", id)))?;
        if group.user_id != user_id {
            return Err(ContractError::Forbidden(format!(
                "Group {} belongs to another user",
                id
            )));
        }
        Ok(group)
    }

    fn create_group(&mut self, user_id: &str, input: &CreateGroupInput) -> Result<Group, ContractError> {
        input.validate()?;
        scope::ensure_parent(self.conn, Table::Spaces, &input.space_id, user_id)?;
        scope::ensure_id_free(self.conn, Table::Groups, &input.id)?;

        let now = Timestamp::now().as_millis();
        self.conn.execute(
            "INSERT INTO bookmark_groups (id, user_id, space_id, name, icon, sort_order, is_archived, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?7)",
            params![input.id, user_id, input.space_id, input.name, input.icon, input.order, now],
        )?;
        debug!(user_id, group_id = %input.id, space_id = %input.space_id, "group created");
        self.get_group(user_id, &input.id)
    }

    fn update_group(&mut self, user_id: &str, input: UpdateGroupInput) -> Result<Group, ContractError> {
        input.validate()?;
        let current = self.get_group(user_id, &input.id)?;

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
        let target_space = input
            .space_id
            .required("spaceId")
            .map_err(ContractError::Validation)?
            .filter(|s| *s != current.space_id);

        let now = Timestamp::now().as_millis();
        let tx = self.conn.unchecked_transaction()?;
        match &target_space {
            Some(space_id) => {
                scope::ensure_parent(&tx, Table::Spaces, space_id, user_id)?;
                let order = scope::next_order(&tx, Table::Groups, "space_id", space_id)?;
                tx.execute(
                    "UPDATE bookmark_groups SET name = ?1, icon = ?2, is_archived = ?3, space_id = ?4, \
                     sort_order = ?5, updated_at = ?6 WHERE id = ?7",
                    params![name, icon, is_archived, space_id, order, now, input.id],
                )?;
                // Bookmarks carry a redundant space_id that must follow their group
                tx.execute(
                    "UPDATE bookmarks SET space_id = ?1, updated_at = ?2 WHERE group_id = ?3",
                    params![space_id, now, input.id],
                )?;
                debug!(user_id, group_id = %input.id, space_id = %space_id, "group moved to another space");
            }
            None => {
                tx.execute(
                    "UPDATE bookmark_groups SET name = ?1, icon = ?2, is_archived = ?3, updated_at = ?4 \
                     WHERE id = ?5",
                    params![name, icon, is_archived, now, input.id],
                )?;
            }
        }
        tx.commit()?;
        debug!(user_id, group_id = %input.id, "group updated");
        self.get_group(user_id, &input.id)
    }

    fn delete_group(&mut self, user_id: &str, id: &str) -> Result<(), ContractError> {
        scope::ensure_owned(self.conn, Table::Groups, id, user_id)?;
        self.conn
            .execute("DELETE FROM bookmark_groups WHERE id = ?1", params![id])?;
        debug!(user_id, group_id = %id, "group deleted");
        Ok(())
    }

    fn reorder_groups(&mut self, user_id: &str, space_id: &str, ordered_ids: &[String]) -> Result<(), ContractError> {
        let members: Vec<String> = self
            .list_groups_in_space(user_id, space_id)?
            .into_iter()
            .map(|g| g.id)
            .collect();
        scope::check_reorder(self.conn, Table::Groups, user_id, &members, ordered_ids)?;
        scope::apply_order(self.conn, Table::Groups, ordered_ids, Timestamp::now().as_millis())?;
        debug!(user_id, space_id, count = ordered_ids.len(), "groups reordered");
        Ok(())
    }
}
