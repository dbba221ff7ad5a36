//! Unit tests for the BookmarkManager public API.
//!
//! These tests exercise bookmark CRUD, per-group reordering and moves between
//! groups and spaces through the `BookmarkManagerTrait` interface, using an
//! in-memory SQLite database.

use spacemarks::contract::bookmarks::{CreateBookmarkInput, MoveBookmarkInput, UpdateBookmarkInput};
use spacemarks::contract::groups::CreateGroupInput;
use spacemarks::contract::spaces::CreateSpaceInput;
use spacemarks::contract::sync::EnsureUserInput;
use spacemarks::database::Database;
use spacemarks::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use spacemarks::managers::group_manager::{GroupManager, GroupManagerTrait};
use spacemarks::managers::space_manager::{SpaceManager, SpaceManagerTrait};
use spacemarks::managers::user_manager::{UserManager, UserManagerTrait};
use spacemarks::types::errors::ContractError;
use spacemarks::types::Patch;

/// Helper: alice owns s1 {g1, g2} and s2 {g3}; bob owns sb {gb}.
fn setup() -> (Database, String, String) {
    let db = Database::open_in_memory().expect("Failed to open in-memory database");
    let (alice, bob) = {
        let mut users = UserManager::new(db.connection());
        let alice = users.ensure_user("auth|alice", &EnsureUserInput::default()).unwrap().id;
        let bob = users.ensure_user("auth|bob", &EnsureUserInput::default()).unwrap().id;
        (alice, bob)
    };
    let mut spaces = SpaceManager::new(db.connection());
    let mut groups = GroupManager::new(db.connection());
    for (owner, space_id, group_ids) in [
        (&alice, "s1", vec!["g1", "g2"]),
        (&alice, "s2", vec!["g3"]),
        (&bob, "sb", vec!["gb"]),
    ] {
        spaces
            .create_space(
                owner,
                &CreateSpaceInput {
                    id: space_id.to_string(),
                    name: space_id.to_string(),
                    order: 0,
                    icon: None,
                    color: None,
                },
            )
            .unwrap();
        for (i, group_id) in group_ids.into_iter().enumerate() {
            groups
                .create_group(
                    owner,
                    &CreateGroupInput {
                        id: group_id.to_string(),
                        space_id: space_id.to_string(),
                        name: group_id.to_string(),
                        order: i as i32,
                        icon: None,
                    },
                )
                .unwrap();
        }
    }
    (db, alice, bob)
}

fn bookmark(id: &str, space_id: &str, group_id: &str, order: i32) -> CreateBookmarkInput {
    CreateBookmarkInput {
        id: id.to_string(),
        space_id: space_id.to_string(),
        group_id: group_id.to_string(),
        title: format!("Bookmark {}", id),
        url: format!("https://example.com/{}", id),
        order,
        description: None,
        favicon_url: None,
        is_pinned: false,
    }
}

fn ids_in(mgr: &BookmarkManager, user_id: &str, group_id: &str) -> Vec<String> {
    mgr.list_bookmarks_in_group(user_id, group_id)
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect()
}

// ─── Create / list ───

#[test]
fn test_create_and_list_in_group() {
    let (db, alice, _) = setup();
    let mut mgr = BookmarkManager::new(db.connection());

    let mut input = bookmark("b2", "s1", "g1", 1);
    input.is_pinned = true;
    input.description = Some("Rust docs".to_string());
    let created = mgr.create_bookmark(&alice, &input).unwrap();
    mgr.create_bookmark(&alice, &bookmark("b1", "s1", "g1", 0)).unwrap();
    mgr.create_bookmark(&alice, &bookmark("b3", "s1", "g2", 0)).unwrap();

    assert!(created.is_pinned);
    assert_eq!(created.description.as_deref(), Some("Rust docs"));
    assert_eq!(ids_in(&mgr, &alice, "g1"), vec!["b1", "b2"]);
    assert_eq!(mgr.list_bookmarks(&alice).unwrap().len(), 3);
}

#[test]
fn test_create_rejects_non_http_url() {
    let (db, alice, _) = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    let mut input = bookmark("b1", "s1", "g1", 0);
    input.url = "javascript:alert(1)".to_string();

    assert!(matches!(mgr.create_bookmark(&alice, &input), Err(ContractError::Validation(_))));
}

#[test]
fn test_create_with_inconsistent_parents_is_validation() {
    let (db, alice, _) = setup();
    let mut mgr = BookmarkManager::new(db.connection());

    let err = mgr.create_bookmark(&alice, &bookmark("b1", "s2", "g1", 0)).unwrap_err();
    assert!(matches!(err, ContractError::Validation(_)));
}

#[test]
fn test_create_with_dangling_group_is_validation() {
    let (db, alice, _) = setup();
    let mut mgr = BookmarkManager::new(db.connection());

    let err = mgr.create_bookmark(&alice, &bookmark("b1", "s1", "g404", 0)).unwrap_err();
    assert!(matches!(err, ContractError::Validation(_)));
}

#[test]
fn test_create_in_foreign_group_is_forbidden() {
    let (db, alice, _) = setup();
    let mut mgr = BookmarkManager::new(db.connection());

    let err = mgr.create_bookmark(&alice, &bookmark("b1", "sb", "gb", 0)).unwrap_err();
    assert!(matches!(err, ContractError::Forbidden(_)));
}

// ─── Update ───

#[test]
fn test_sparse_update_clears_nullable_fields() {
    let (db, alice, _) = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    let mut input = bookmark("b1", "s1", "g1", 0);
    input.description = Some("old".to_string());
    input.favicon_url = Some("https://example.com/favicon.ico".to_string());
    mgr.create_bookmark(&alice, &input).unwrap();

    let updated = mgr
        .update_bookmark(
            &alice,
            UpdateBookmarkInput {
                id: "b1".to_string(),
                description: Patch::Null,
                is_pinned: Patch::Value(true),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.description, None);
    assert_eq!(updated.favicon_url.as_deref(), Some("https://example.com/favicon.ico"));
    assert!(updated.is_pinned);
    assert_eq!(updated.title, "Bookmark b1");
}

#[test]
fn test_update_group_only_follows_group_space() {
    let (db, alice, _) = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    mgr.create_bookmark(&alice, &bookmark("b1", "s1", "g1", 0)).unwrap();
    mgr.create_bookmark(&alice, &bookmark("b9", "s2", "g3", 7)).unwrap();

    let updated = mgr
        .update_bookmark(
            &alice,
            UpdateBookmarkInput {
                id: "b1".to_string(),
                group_id: Patch::Value("g3".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.group_id, "g3");
    assert_eq!(updated.space_id, "s2");
    assert_eq!(updated.order, 8);
}

#[test]
fn test_update_space_only_must_match_current_group() {
    let (db, alice, _) = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    mgr.create_bookmark(&alice, &bookmark("b1", "s1", "g1", 0)).unwrap();

    let err = mgr
        .update_bookmark(
            &alice,
            UpdateBookmarkInput {
                id: "b1".to_string(),
                space_id: Patch::Value("s2".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, ContractError::Validation(_)));
    assert_eq!(mgr.get_bookmark(&alice, "b1").unwrap().space_id, "s1");
}

#[test]
fn test_update_rejects_null_title() {
    let (db, alice, _) = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    mgr.create_bookmark(&alice, &bookmark("b1", "s1", "g1", 0)).unwrap();

    let err = mgr
        .update_bookmark(
            &alice,
            UpdateBookmarkInput { id: "b1".to_string(), title: Patch::Null, ..Default::default() },
        )
        .unwrap_err();
    assert!(matches!(err, ContractError::Validation(_)));
}

// ─── Delete ───

#[test]
fn test_delete_bookmark() {
    let (db, alice, bob) = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    mgr.create_bookmark(&alice, &bookmark("b1", "s1", "g1", 0)).unwrap();

    assert!(matches!(mgr.delete_bookmark(&bob, "b1"), Err(ContractError::Forbidden(_))));
    mgr.delete_bookmark(&alice, "b1").unwrap();
    assert!(matches!(mgr.get_bookmark(&alice, "b1"), Err(ContractError::NotFound(_))));
    assert!(matches!(mgr.delete_bookmark(&alice, "b1"), Err(ContractError::NotFound(_))));
}

// ─── Reorder ───

#[test]
fn test_reorder_bookmarks_in_group() {
    let (db, alice, _) = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    for (i, id) in ["b1", "b2", "b3"].iter().enumerate() {
        mgr.create_bookmark(&alice, &bookmark(id, "s1", "g1", i as i32)).unwrap();
    }

    let order: Vec<String> = ["b3", "b1", "b2"].iter().map(|s| s.to_string()).collect();
    mgr.reorder_bookmarks(&alice, "g1", &order).unwrap();

    let listed = mgr.list_bookmarks_in_group(&alice, "g1").unwrap();
    assert_eq!(listed.iter().map(|b| b.id.as_str()).collect::<Vec<_>>(), vec!["b3", "b1", "b2"]);
    assert_eq!(listed.iter().map(|b| b.order).collect::<Vec<_>>(), vec![0, 1, 2]);
}

#[test]
fn test_reorder_with_bookmark_from_other_group_is_validation() {
    let (db, alice, _) = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    mgr.create_bookmark(&alice, &bookmark("b1", "s1", "g1", 0)).unwrap();
    mgr.create_bookmark(&alice, &bookmark("b2", "s1", "g2", 0)).unwrap();

    let err = mgr
        .reorder_bookmarks(&alice, "g1", &["b1".to_string(), "b2".to_string()])
        .unwrap_err();
    assert!(matches!(err, ContractError::Validation(_)));
}

// ─── Move ───

#[test]
fn test_move_across_spaces_appends() {
    let (db, alice, _) = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    mgr.create_bookmark(&alice, &bookmark("b1", "s1", "g1", 0)).unwrap();
    mgr.create_bookmark(&alice, &bookmark("b2", "s2", "g3", 0)).unwrap();

    let moved = mgr
        .move_bookmark(
            &alice,
            &MoveBookmarkInput {
                id: "b1".to_string(),
                group_id: "g3".to_string(),
                space_id: "s2".to_string(),
            },
        )
        .unwrap();

    assert_eq!((moved.group_id.as_str(), moved.space_id.as_str()), ("g3", "s2"));
    assert_eq!(moved.order, 1);
    assert!(ids_in(&mgr, &alice, "g1").is_empty());
    assert_eq!(ids_in(&mgr, &alice, "g3"), vec!["b2", "b1"]);
}

#[test]
fn test_move_with_mismatched_space_changes_nothing() {
    let (db, alice, _) = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    mgr.create_bookmark(&alice, &bookmark("b1", "s1", "g1", 0)).unwrap();

    let err = mgr
        .move_bookmark(
            &alice,
            &MoveBookmarkInput {
                id: "b1".to_string(),
                group_id: "g3".to_string(),
                space_id: "s1".to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, ContractError::Validation(_)));

    let b = mgr.get_bookmark(&alice, "b1").unwrap();
    assert_eq!((b.group_id.as_str(), b.space_id.as_str()), ("g1", "s1"));
}

#[test]
fn test_move_into_foreign_group_is_forbidden() {
    let (db, alice, _) = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    mgr.create_bookmark(&alice, &bookmark("b1", "s1", "g1", 0)).unwrap();

    let err = mgr
        .move_bookmark(
            &alice,
            &MoveBookmarkInput {
                id: "b1".to_string(),
                group_id: "gb".to_string(),
                space_id: "sb".to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, ContractError::Forbidden(_)));
}

#[test]
fn test_move_to_current_group_is_unchanged() {
    let (db, alice, _) = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    let created = mgr.create_bookmark(&alice, &bookmark("b1", "s1", "g1", 3)).unwrap();

    let same = mgr
        .move_bookmark(
            &alice,
            &MoveBookmarkInput {
                id: "b1".to_string(),
                group_id: "g1".to_string(),
                space_id: "s1".to_string(),
            },
        )
        .unwrap();
    assert_eq!(same, created);
}

#[test]
fn test_move_into_group_at_max_order_is_conflict() {
    let (db, alice, _) = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    mgr.create_bookmark(&alice, &bookmark("b1", "s1", "g1", 0)).unwrap();
    mgr.create_bookmark(&alice, &bookmark("b2", "s1", "g2", i32::MAX)).unwrap();

    let err = mgr
        .move_bookmark(
            &alice,
            &MoveBookmarkInput {
                id: "b1".to_string(),
                group_id: "g2".to_string(),
                space_id: "s1".to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, ContractError::Conflict(_)), "got {:?}", err);
    assert_eq!(ids_in(&mgr, &alice, "g1"), vec!["b1"]);

    let err = mgr
        .update_bookmark(
            &alice,
            UpdateBookmarkInput {
                id: "b1".to_string(),
                group_id: Patch::Value("g2".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, ContractError::Conflict(_)), "got {:?}", err);

    // After a reorder the scope has room again
    mgr.reorder_bookmarks(&alice, "g2", &["b2".to_string()]).unwrap();
    let moved = mgr
        .move_bookmark(
            &alice,
            &MoveBookmarkInput {
                id: "b1".to_string(),
                group_id: "g2".to_string(),
                space_id: "s1".to_string(),
            },
        )
        .unwrap();
    assert_eq!(moved.order, 1);
}
