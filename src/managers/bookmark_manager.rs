//! Bookmark Manager for Spacemarks.
//!
//! Implements `BookmarkManagerTrait`: CRUD, per-group reordering and atomic
//! moves between groups and spaces, backed by SQLite via `rusqlite`.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::group_manager::{GroupManager, GroupManagerTrait};
use super::scope::{self, Table};
use crate::contract::bookmarks::{CreateBookmarkInput, MoveBookmarkInput, UpdateBookmarkInput};
use crate::types::errors::ContractError;
use crate::types::{Bookmark, Group, Timestamp};

const BOOKMARK_COLUMNS: &str = "id, user_id, space_id, group_id, title, url, favicon_url, description, \
     sort_order, is_pinned, is_archived, created_at, updated_at";

/// Trait defining bookmark management operations. Every call is scoped to `user_id`.
pub trait BookmarkManagerTrait {
    fn list_bookmarks(&self, user_id: &str) -> Result<Vec<Bookmark>, ContractError>;
    fn list_bookmarks_in_group(&self, user_id: &str, group_id: &str) -> Result<Vec<Bookmark>, ContractError>;
    fn get_bookmark(&self, user_id: &str, id: &str) -> Result<Bookmark, ContractError>;
    fn create_bookmark(&mut self, user_id: &str, input: &CreateBookmarkInput) -> Result<Bookmark, ContractError>;
    fn update_bookmark(&mut self, user_id: &str, input: UpdateBookmarkInput) -> Result<Bookmark, ContractError>;
    fn delete_bookmark(&mut self, user_id: &str, id: &str) -> Result<(), ContractError>;
    fn reorder_bookmarks(&mut self, user_id: &str, group_id: &str, ordered_ids: &[String]) -> Result<(), ContractError>;
    /// Re-parents a bookmark to `group_id`/`space_id` and appends it to the end of that group.
    fn move_bookmark(&mut self, user_id: &str, input: &MoveBookmarkInput) -> Result<Bookmark, ContractError>;
}

/// Bookmark manager backed by a SQLite connection.
pub struct BookmarkManager<'a> {
    conn: &'a Connection,
}

impl<'a> BookmarkManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn row_to_bookmark(row: &rusqlite::Row) -> rusqlite::Result<Bookmark> {
        Ok(Bookmark {
            id: row.get(0)?,
            user_id: row.get(1)?,
            space_id: row.get(2)?,
            group_id: row.get(3)?,
            title: row.get(4)?,
            url: row.get(5)?,
            favicon_url: row.get(6)?,
            description: row.get(7)?,
            order: row.get(8)?,
            is_pinned: row.get(9)?,
            is_archived: row.get(10)?,
            created_at: Timestamp::from_millis(row.get(11)?),
            updated_at: Timestamp::from_millis(row.get(12)?),
        })
    }

    fn groups(&self) -> GroupManager<'a> {
        GroupManager::new(self.conn)
    }

    /// Loads a referenced group; an unknown id is a dangling reference.
    fn parent_group(&self, user_id: &str, group_id: &str) -> Result<Group, ContractError> {
        self.groups()
            .get_group(user_id, group_id)
            .map_err(|e| scope::dangling(e, Table::Groups, group_id))
    }

    /// Loads the target group and checks it lives in `space_id`.
    fn consistent_parent(&self, user_id: &str, group_id: &str, space_id: &str) -> Result<Group, ContractError> {
        let group = self.parent_group(user_id, group_id)?;
        if group.space_id != space_id {
            return Err(ContractError::Validation(format!(
                "Group {} does not belong to Space {}",
                group_id, space_id
            )));
        }
        Ok(group)
    }
}

impl<'a> BookmarkManagerTrait for BookmarkManager<'a> {
    fn list_bookmarks(&self, user_id: &str) -> Result<Vec<Bookmark>, ContractError> {
        let sql = format!(
            "SELECT {} FROM bookmarks WHERE user_id = ?1 ORDER BY group_id, sort_order, created_at, id",
            BOOKMARK_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id], Self::row_to_bookmark)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn list_bookmarks_in_group(&self, user_id: &str, group_id: &str) -> Result<Vec<Bookmark>, ContractError> {
        scope::ensure_owned(self.conn, Table::Groups, group_id, user_id)?;
        let sql = format!(
            "SELECT {} FROM bookmarks WHERE user_id = ?1 AND group_id = ?2 \
             ORDER BY sort_order, created_at, id",
            BOOKMARK_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id, group_id], Self::row_to_bookmark)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn get_bookmark(&self, user_id: &str, id: &str) -> Result<Bookmark, ContractError> {
        let sql = format!("SELECT {} FROM bookmarks WHERE id = ?1", BOOKMARK_COLUMNS);
        let bookmark = self
            .conn
            .query_row(&sql, params![id], Self::row_to_bookmark)
            .optional()?
            .ok_or_else(|| ContractError::NotFound(format!("Bookmark {}", id)))?;
        if bookmark.user_id != user_id {
            return Err(ContractError::Forbidden(format!(
                "Bookmark {} belongs to another user",
                id
            )));
        }
        Ok(bookmark)
    }

    fn create_bookmark(&mut self, user_id: &str, input: &CreateBookmarkInput) -> Result<Bookmark, ContractError> {
        input.validate()?;
        scope::ensure_parent(self.conn, Table::Spaces, &input.space_id, user_id)?;
        self.consistent_parent(user_id, &input.group_id, &input.space_id)?;
        scope::ensure_id_free(self.conn, Table::Bookmarks, &input.id)?;

        let now = Timestamp::now().as_millis();
        self.conn.execute(
            "INSERT INTO bookmarks (id, user_id, space_id, group_id, title, url, favicon_url, description, \
             sort_order, is_pinned, is_archived, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 0, ?11, ?11)",
            params![
                input.id,
                user_id,
                input.space_id,
                input.group_id,
                input.title,
                input.url,
                input.favicon_url,
                input.description,
                input.order,
                input.is_pinned,
                now
            ],
        )?;
        debug!(user_id, bookmark_id = %input.id, group_id = %input.group_id, "bookmark created");
        self.get_bookmark(user_id, &input.id)
    }

    fn update_bookmark(&mut self, user_id: &str, input: UpdateBookmarkInput) -> Result<Bookmark, ContractError> {
        input.validate()?;
        let current = self.get_bookmark(user_id, &input.id)?;

        let title = input.title.required("title").map_err(ContractError::Validation)?;
        let url = input.url.required("url").map_err(ContractError::Validation)?;
        let is_pinned = input.is_pinned.required("isPinned").map_err(ContractError::Validation)?;
        let is_archived = input
            .is_archived
            .required("isArchived")
            .map_err(ContractError::Validation)?;
        let group_patch = input.group_id.required("groupId").map_err(ContractError::Validation)?;
        let space_patch = input.space_id.required("spaceId").map_err(ContractError::Validation)?;

        let group_id = group_patch.unwrap_or_else(|| current.group_id.clone());
        let group_changed = group_id != current.group_id;
        let space_id = match space_patch {
            Some(space_id) => {
                scope::ensure_parent(self.conn, Table::Spaces, &space_id, user_id)?;
                space_id
            }
            None if group_changed => self.parent_group(user_id, &group_id)?.space_id,
            None => current.space_id.clone(),
        };
        self.consistent_parent(user_id, &group_id, &space_id)?;

        let order = if group_changed {
            scope::next_order(self.conn, Table::Bookmarks, "group_id", &group_id)?
        } else {
            current.order
        };

        self.conn.execute(
            "UPDATE bookmarks SET title = ?1, url = ?2, description = ?3, favicon_url = ?4, group_id = ?5, \
             space_id = ?6, sort_order = ?7, is_pinned = ?8, is_archived = ?9, updated_at = ?10 WHERE id = ?11",
            params![
                title.unwrap_or(current.title),
                url.unwrap_or(current.url),
                input.description.apply_to(current.description),
                input.favicon_url.apply_to(current.favicon_url),
                group_id,
                space_id,
                order,
                is_pinned.unwrap_or(current.is_pinned),
                is_archived.unwrap_or(current.is_archived),
                Timestamp::now().as_millis(),
                input.id
            ],
        )?;
        debug!(user_id, bookmark_id = %input.id, "bookmark updated");
        self.get_bookmark(user_id, &input.id)
    }

    fn delete_bookmark(&mut self, user_id: &str, id: &str) -> Result<(), ContractError> {
        scope::ensure_owned(self.conn, Table::Bookmarks, id, user_id)?;
        self.conn
            .execute("DELETE FROM bookmarks WHERE id = ?1", params![id])?;
        debug!(user_id, bookmark_id = %id, "bookmark deleted");
        Ok(())
    }

    fn reorder_bookmarks(&mut self, user_id: &str, group_id: &str, ordered_ids: &[String]) -> Result<(), ContractError> {
        let members: Vec<String> = self
            .list_bookmarks_in_group(user_id, group_id)?
            .into_iter()
            .map(|b| b.id)
            .collect();
        scope::check_reorder(self.conn, Table::Bookmarks, user_id, &members, ordered_ids)?;
        scope::apply_order(self.conn, Table::Bookmarks, ordered_ids, Timestamp::now().as_millis())?;
        debug!(user_id, group_id, count = ordered_ids.len(), "bookmarks reordered");
        Ok(())
    }

    fn move_bookmark(&mut self, user_id: &str, input: &MoveBookmarkInput) -> Result<Bookmark, ContractError> {
        input.validate()?;
        let current = self.get_bookmark(user_id, &input.id)?;
        scope::ensure_parent(self.conn, Table::Spaces, &input.space_id, user_id)?;
        self.consistent_parent(user_id, &input.group_id, &input.space_id)?;

        if current.group_id == input.group_id {
            return Ok(current);
        }

        let tx = self.conn.unchecked_transaction()?;
        let order = scope::next_order(&tx, Table::Bookmarks, "group_id", &input.group_id)?;
        tx.execute(
            "UPDATE bookmarks SET group_id = ?1, space_id = ?2, sort_order = ?3, updated_at = ?4 WHERE id = ?5",
            params![input.group_id, input.space_id, order, Timestamp::now().as_millis(), input.id],
        )?;
        tx.commit()?;
        debug!(
            user_id,
            bookmark_id = %input.id,
            from = %current.group_id,
            to = %input.group_id,
            "bookmark moved"
        );
        self.get_bookmark(user_id, &input.id)
    }
}
