//! Unit tests for the database layer: migrations, pragmas and cascades.

use rusqlite::{params, Connection};
use tempfile::TempDir;

use spacemarks::database::migrations::{get_schema_version, run_all, CURRENT_SCHEMA_VERSION};
use spacemarks::database::Database;

fn table_exists(db: &Database, name: &str) -> bool {
    db.connection()
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![name],
            |row| row.get::<_, i64>(0),
        )
        .unwrap()
        == 1
}

#[test]
fn test_in_memory_database_has_all_tables() {
    let db = Database::open_in_memory().unwrap();
    for table in ["users", "spaces", "bookmark_groups", "bookmarks", "schema_version"] {
        assert!(table_exists(&db, table), "missing table {}", table);
    }
}

#[test]
fn test_schema_version_is_current() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_reopening_does_not_rerun_migrations() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("spacemarks.db");
    {
        let db = Database::open(&path).unwrap();
        db.connection()
            .execute(
                "INSERT INTO users (id, subject, created_at, updated_at) VALUES ('u1', 'auth|1', 0, 0)",
                [],
            )
            .unwrap();
    }
    let db = Database::open(&path).unwrap();
    let versions: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(versions, CURRENT_SCHEMA_VERSION as i64);
    let users: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
        .unwrap();
    assert_eq!(users, 1);
}

#[test]
fn test_foreign_keys_enabled() {
    let db = Database::open_in_memory().unwrap();
    let on: i64 = db
        .connection()
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .unwrap();
    assert_eq!(on, 1);
}

#[test]
fn test_ordering_indexes_exist() {
    let db = Database::open_in_memory().unwrap();
    let count: i64 = db
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name IN \
             ('idx_spaces_user_order', 'idx_groups_space_order', 'idx_bookmarks_group_order', 'idx_bookmarks_user')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 4);
}

#[test]
fn test_deleting_space_cascades_at_sql_level() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection();
    conn.execute_batch(
        "INSERT INTO users (id, subject, created_at, updated_at) VALUES ('u1', 'auth|1', 0, 0);
         INSERT INTO spaces (id, user_id, name, sort_order, is_archived, created_at, updated_at)
             VALUES ('s1', 'u1', 'Work', 0, 0, 0, 0);
         INSERT INTO bookmark_groups (id, user_id, space_id, name, sort_order, is_archived, created_at, updated_at)
             VALUES ('g1', 'u1', 's1', 'Docs', 0, 0, 0, 0);
         INSERT INTO bookmarks (id, user_id, space_id, group_id, title, url, sort_order, is_pinned, is_archived, created_at, updated_at)
             VALUES ('b1', 'u1', 's1', 'g1', 'Rust', 'https://rust-lang.org', 0, 0, 0, 0, 0);",
    )
    .unwrap();

    conn.execute("DELETE FROM spaces WHERE id = 's1'", []).unwrap();

    let groups: i64 = conn
        .query_row("SELECT COUNT(*) FROM bookmark_groups", [], |row| row.get(0))
        .unwrap();
    let bookmarks: i64 = conn
        .query_row("SELECT COUNT(*) FROM bookmarks", [], |row| row.get(0))
        .unwrap();
    assert_eq!((groups, bookmarks), (0, 0));
}

#[test]
fn test_failed_migration_is_rolled_back() {
    let conn = Connection::open_in_memory().unwrap();
    // A pre-existing bookmarks table without sort_order breaks the v2 indexes
    conn.execute_batch("CREATE TABLE bookmarks (id TEXT PRIMARY KEY);")
        .unwrap();

    assert!(run_all(&conn).is_err());

    assert_eq!(get_schema_version(&conn), 1);
    let partial: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_spaces_user_order'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(partial, 0, "v2 left an index behind");
}
