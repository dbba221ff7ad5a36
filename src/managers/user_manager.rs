//! User Manager for Spacemarks.
//!
//! Provisions the server-side user record for an external caller subject and
//! answers whether that user already owns data.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};
use uuid::Uuid;

use crate::contract::sync::EnsureUserInput;
use crate::types::errors::ContractError;
use crate::types::{Timestamp, User};

/// Trait defining user provisioning operations.
pub trait UserManagerTrait {
    /// Creates the user for `subject` or returns the existing one. Supplied
    /// profile fields overwrite stored ones; omitted fields are kept.
    fn ensure_user(&mut self, subject: &str, input: &EnsureUserInput) -> Result<User, ContractError>;
    fn find_by_subject(&self, subject: &str) -> Result<Option<User>, ContractError>;
    fn has_data(&self, user_id: &str) -> Result<bool, ContractError>;
}

/// User manager backed by a SQLite connection.
pub struct UserManager<'a> {
    conn: &'a Connection,
}

impl<'a> UserManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            subject: row.get(1)?,
            email: row.get(2)?,
            name: row.get(3)?,
            avatar_url: row.get(4)?,
            created_at: Timestamp::from_millis(row.get(5)?),
            updated_at: Timestamp::from_millis(row.get(6)?),
        })
    }
}

impl<'a> UserManagerTrait for UserManager<'a> {
    fn ensure_user(&mut self, subject: &str, input: &EnsureUserInput) -> Result<User, ContractError> {
        if subject.trim().is_empty() {
            return Err(ContractError::Unauthorized("caller subject is empty".to_string()));
        }
        let now = Timestamp::now().as_millis();

        // INSERT OR IGNORE keeps this idempotent even if two calls race on the same subject
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO users (id, subject, email, name, avatar_url, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                Uuid::new_v4().to_string(),
                subject,
                input.email,
                input.name,
                input.avatar_url,
                now
            ],
        )?;

        if inserted == 0 && (input.email.is_some() || input.name.is_some() || input.avatar_url.is_some()) {
            self.conn.execute(
                "UPDATE users SET email = COALESCE(?1, email), name = COALESCE(?2, name), \
                 avatar_url = COALESCE(?3, avatar_url), updated_at = ?4 WHERE subject = ?5",
                params![input.email, input.name, input.avatar_url, now, subject],
            )?;
        }

        let user = self
            .find_by_subject(subject)?
            .ok_or_else(|| ContractError::Database(format!("user for {} vanished", subject)))?;
        if inserted > 0 {
            info!(user_id = %user.id, "user provisioned");
        } else {
            debug!(user_id = %user.id, "user already provisioned");
        }
        Ok(user)
    }

    fn find_by_subject(&self, subject: &str) -> Result<Option<User>, ContractError> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, subject, email, name, avatar_url, created_at, updated_at \
                 FROM users WHERE subject = ?1",
                params![subject],
                Self::row_to_user,
            )
            .optional()?)
    }

    fn has_data(&self, user_id: &str) -> Result<bool, ContractError> {
        let found: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM spaces WHERE user_id = ?1) \
                 OR EXISTS(SELECT 1 FROM bookmark_groups WHERE user_id = ?1) \
                 OR EXISTS(SELECT 1 FROM bookmarks WHERE user_id = ?1)",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(found)
    }
}
