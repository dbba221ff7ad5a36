//! Ownership checks and bulk reordering shared by the entity managers.

use std::collections::HashSet;

use rusqlite::{params, Connection, OptionalExtension};

use crate::types::errors::ContractError;

/// Tables holding ordered, user-owned entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Table {
    Spaces,
    Groups,
    Bookmarks,
}

impl Table {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Table::Spaces => "spaces",
            Table::Groups => "bookmark_groups",
            Table::Bookmarks => "bookmarks",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Table::Spaces => "Space",
            Table::Groups => "Group",
            Table::Bookmarks => "Bookmark",
        }
    }
}

/// Returns the owning user of a row, or `None` if the id is unknown.
pub(crate) fn owner_of(
    conn: &Connection,
    table: Table,
    id: &str,
) -> Result<Option<String>, ContractError> {
    let sql = format!("SELECT user_id FROM {} WHERE id = ?1", table.name());
    Ok(conn
        .query_row(&sql, params![id], |row| row.get(0))
        .optional()?)
}

/// Fails with `NotFound` for unknown ids and `Forbidden` for other users' rows.
pub(crate) fn ensure_owned(
    conn: &Connection,
    table: Table,
    id: &str,
    user_id: &str,
) -> Result<(), ContractError> {
    match owner_of(conn, table, id)? {
        None => Err(ContractError::NotFound(format!("{} {}", table.label(), id))),
        Some(owner) if owner != user_id => Err(ContractError::Forbidden(format!(
            "{} {} belongs to another user",
            table.label(),
            id
        ))),
        Some(_) => Ok(()),
    }
}

/// Like [`ensure_owned`], but for a referenced parent: an unknown id is a
/// dangling reference (`Validation`) rather than `NotFound`.
pub(crate) fn ensure_parent(
    conn: &Connection,
    table: Table,
    id: &str,
    user_id: &str,
) -> Result<(), ContractError> {
    ensure_owned(conn, table, id, user_id).map_err(|e| dangling(e, table, id))
}

/// Rewrites `NotFound` for a referenced parent into `Validation`.
pub(crate) fn dangling(err: ContractError, table: Table, id: &str) -> ContractError {
    match err {
        ContractError::NotFound(_) => {
            ContractError::Validation(format!("{} {} does not exist", table.label(), id))
        }
        other => other,
    }
}

/// Fails with `Conflict` if any row already uses `id`.
pub(crate) fn ensure_id_free(conn: &Connection, table: Table, id: &str) -> Result<(), ContractError> {
    if owner_of(conn, table, id)?.is_some() {
        return Err(ContractError::Conflict(format!(
            "{} {} already exists",
            table.label(),
            id
        )));
    }
    Ok(())
}

/// Next order value at the end of a scope (`0` for an empty scope).
///
/// Fails with `Conflict` when the scope's last order is already `i32::MAX`.
pub(crate) fn next_order(
    conn: &Connection,
    table: Table,
    scope_column: &str,
    scope_id: &str,
) -> Result<i32, ContractError> {
    let sql = format!(
        "SELECT COALESCE(MAX(sort_order), -1) + 1 FROM {} WHERE {} = ?1",
        table.name(),
        scope_column
    );
    let next: i64 = conn.query_row(&sql, params![scope_id], |row| row.get(0))?;
    i32::try_from(next).map_err(|_| {
        ContractError::Conflict(format!(
            "no order left after the last {} in {} {}; reorder the scope first",
            table.label().to_lowercase(),
            scope_column,
            scope_id
        ))
    })
}

/// Checks a reorder list against the current members of its scope.
///
/// Duplicates and ids outside the scope are `Validation`, other users' ids are
/// `Forbidden`, and members missing from the list mean the list is stale
/// (`Conflict`).
pub(crate) fn check_reorder(
    conn: &Connection,
    table: Table,
    user_id: &str,
    members: &[String],
    ordered_ids: &[String],
) -> Result<(), ContractError> {
    check_partial_reorder(conn, table, user_id, members, &[], ordered_ids)
}

/// Like [`check_reorder`], but ids in `optional` belong to the scope without
/// being required in the list.
pub(crate) fn check_partial_reorder(
    conn: &Connection,
    table: Table,
    user_id: &str,
    members: &[String],
    optional: &[String],
    ordered_ids: &[String],
) -> Result<(), ContractError> {
    let mut seen = HashSet::with_capacity(ordered_ids.len());
    for id in ordered_ids {
        if !seen.insert(id.as_str()) {
            return Err(ContractError::Validation(format!(
                "duplicate id in orderedIds: {}",
                id
            )));
        }
    }

    let scope: HashSet<&str> = members
        .iter()
        .chain(optional)
        .map(String::as_str)
        .collect();
    for id in ordered_ids {
        if scope.contains(id.as_str()) {
            continue;
        }
        return Err(match owner_of(conn, table, id)? {
            Some(owner) if owner != user_id => ContractError::Forbidden(format!(
                "{} {} belongs to another user",
                table.label(),
                id
            )),
            Some(_) => ContractError::Validation(format!(
                "{} {} is not part of the reordered scope",
                table.label(),
                id
            )),
            None => ContractError::Validation(format!("unknown {} id: {}", table.label(), id)),
        });
    }

    let missing: Vec<&str> = members
        .iter()
        .map(String::as_str)
        .filter(|id| !seen.contains(id))
        .collect();
    if !missing.is_empty() {
        return Err(ContractError::Conflict(format!(
            "orderedIds is stale, missing: {}",
            missing.join(", ")
        )));
    }
    Ok(())
}

/// Writes `order = index` for every id, in one transaction.
pub(crate) fn apply_order(
    conn: &Connection,
    table: Table,
    ordered_ids: &[String],
    now: i64,
) -> Result<(), ContractError> {
    let tx = conn.unchecked_transaction()?;
    {
        let sql = format!(
            "UPDATE {} SET sort_order = ?1, updated_at = ?2 WHERE id = ?3",
            table.name()
        );
        let mut stmt = tx.prepare(&sql)?;
        for (index, id) in ordered_ids.iter().enumerate() {
            stmt.execute(params![index as i64, now, id])?;
        }
    }
    tx.commit()?;
    Ok(())
}
