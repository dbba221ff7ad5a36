//! Shape tests for the contract: which payloads each procedure accepts.
//!
//! Decoding is the gate for required fields, so these tests only use serde;
//! no database is involved.

use rstest::rstest;
use serde_json::{json, Value};

use spacemarks::contract::{bookmarks, groups, route, spaces, sync, Procedure, ProcedureKind, ROUTES};
use spacemarks::types::{Bookmark, Group, Patch, Space, Timestamp};

fn accepts<P: Procedure>(params: Value) -> bool {
    serde_json::from_value::<P::Input>(params).is_ok()
}

fn accepts_path(path: &str, params: Value) -> bool {
    match path {
        "spaces.list" => accepts::<spaces::List>(params),
        "spaces.create" => accepts::<spaces::Create>(params),
        "spaces.update" => accepts::<spaces::Update>(params),
        "spaces.delete" => accepts::<spaces::Delete>(params),
        "spaces.reorder" => accepts::<spaces::Reorder>(params),
        "groups.list" => accepts::<groups::List>(params),
        "groups.create" => accepts::<groups::Create>(params),
        "groups.update" => accepts::<groups::Update>(params),
        "groups.delete" => accepts::<groups::Delete>(params),
        "groups.reorder" => accepts::<groups::Reorder>(params),
        "bookmarks.list" => accepts::<bookmarks::List>(params),
        "bookmarks.create" => accepts::<bookmarks::Create>(params),
        "bookmarks.update" => accepts::<bookmarks::Update>(params),
        "bookmarks.delete" => accepts::<bookmarks::Delete>(params),
        "bookmarks.reorder" => accepts::<bookmarks::Reorder>(params),
        "bookmarks.move" => accepts::<bookmarks::Move>(params),
        "sync.ensureUser" => accepts::<sync::EnsureUser>(params),
        "sync.status" => accepts::<sync::Status>(params),
        other => panic!("no marker for {}", other),
    }
}

// ─── Conforming inputs decode ───

#[rstest]
#[case("spaces.list", json!({}))]
#[case("spaces.create", json!({"id": "s1", "name": "Work", "order": 0}))]
#[case("spaces.update", json!({"id": "s1", "name": "Home", "color": null}))]
#[case("spaces.delete", json!({"id": "s1"}))]
#[case("spaces.reorder", json!({"orderedIds": ["s2", "s1"]}))]
#[case("groups.list", json!({}))]
#[case("groups.create", json!({"id": "g1", "spaceId": "s1", "name": "Docs", "order": 0}))]
#[case("groups.update", json!({"id": "g1", "spaceId": "s2"}))]
#[case("groups.delete", json!({"id": "g1"}))]
#[case("groups.reorder", json!({"spaceId": "s1", "orderedIds": ["g1"]}))]
#[case("bookmarks.list", json!({}))]
#[case(
    "bookmarks.create",
    json!({"id": "b1", "spaceId": "s1", "groupId": "g1", "title": "Rust", "url": "https://rust-lang.org", "order": 0})
)]
#[case("bookmarks.update", json!({"id": "b1", "isPinned": true}))]
#[case("bookmarks.delete", json!({"id": "b1"}))]
#[case("bookmarks.reorder", json!({"groupId": "g1", "orderedIds": []}))]
#[case("bookmarks.move", json!({"id": "b1", "groupId": "g2", "spaceId": "s2"}))]
#[case("sync.ensureUser", json!({}))]
#[case("sync.ensureUser", json!({"email": "a@example.com", "name": "Ada"}))]
#[case("sync.status", json!({}))]
fn test_conforming_input_decodes(#[case] path: &str, #[case] params: Value) {
    assert!(accepts_path(path, params), "{} rejected a conforming input", path);
}

// ─── Missing required fields are rejected ───

#[rstest]
#[case("spaces.create", json!({"id": "s1", "order": 0}))]
#[case("spaces.create", json!({"id": "s1", "name": "Work"}))]
#[case("spaces.update", json!({"name": "Work"}))]
#[case("spaces.delete", json!({}))]
#[case("spaces.reorder", json!({}))]
#[case("groups.create", json!({"id": "g1", "name": "Docs", "order": 0}))]
#[case("groups.update", json!({"spaceId": "s1"}))]
#[case("groups.delete", json!({}))]
#[case("groups.reorder", json!({"orderedIds": ["g1"]}))]
#[case("groups.reorder", json!({"spaceId": "s1"}))]
#[case(
    "bookmarks.create",
    json!({"id": "b1", "spaceId": "s1", "title": "Rust", "url": "https://rust-lang.org", "order": 0})
)]
#[case("bookmarks.update", json!({"title": "Rust"}))]
#[case("bookmarks.delete", json!({}))]
#[case("bookmarks.reorder", json!({"orderedIds": ["b1"]}))]
#[case("bookmarks.move", json!({"groupId": "g2", "spaceId": "s2"}))]
#[case("bookmarks.move", json!({"id": "b1", "spaceId": "s2"}))]
#[case("bookmarks.move", json!({"id": "b1", "groupId": "g2"}))]
fn test_missing_required_field_is_rejected(#[case] path: &str, #[case] params: Value) {
    assert!(!accepts_path(path, params), "{} accepted an incomplete input", path);
}

#[test]
fn test_every_route_has_a_case() {
    for r in ROUTES {
        // Panics inside accepts_path if a route has no marker
        let _ = accepts_path(r.path, json!({}));
    }
}

// ─── Specific shapes ───

#[test]
fn test_space_create_without_icon_or_color() {
    let input: spaces::CreateSpaceInput =
        serde_json::from_value(json!({"id": "s1", "name": "Work", "order": 0})).unwrap();
    assert_eq!(input.icon, None);
    assert_eq!(input.color, None);
}

#[test]
fn test_move_is_distinct_from_update() {
    assert_ne!(bookmarks::Move::PATH, bookmarks::Update::PATH);
    assert_eq!(bookmarks::Move::KIND, ProcedureKind::Mutate);
    let input: bookmarks::MoveBookmarkInput =
        serde_json::from_value(json!({"id": "b1", "groupId": "g2", "spaceId": "s2"})).unwrap();
    assert_eq!(input.group_id, "g2");
    assert_eq!(input.space_id, "s2");
}

#[rstest]
#[case("spaces.update")]
#[case("groups.update")]
#[case("bookmarks.update")]
fn test_update_accepts_id_alone(#[case] path: &str) {
    assert!(accepts_path(path, json!({"id": "x1"})));
}

#[test]
fn test_update_distinguishes_null_from_absent() {
    let input: bookmarks::UpdateBookmarkInput =
        serde_json::from_value(json!({"id": "b1", "description": null})).unwrap();
    assert_eq!(input.description, Patch::Null);
    assert_eq!(input.favicon_url, Patch::Absent);

    let encoded = serde_json::to_value(&input).unwrap();
    assert_eq!(encoded, json!({"id": "b1", "description": null}));
}

#[test]
fn test_every_route_is_listed_once_with_its_kind() {
    assert_eq!(ROUTES.len(), 18);
    assert_eq!(route("sync.ensureUser").map(|r| r.kind), Some(ProcedureKind::Mutate));
    assert_eq!(route("sync.status").map(|r| r.kind), Some(ProcedureKind::Query));
    assert_eq!(route("groups.list").map(|r| r.kind), Some(ProcedureKind::Query));
}

// ─── Entity timestamps ───

#[test]
fn test_space_accepts_textual_and_numeric_timestamps() {
    let textual: Space = serde_json::from_value(json!({
        "id": "s1", "userId": "u1", "name": "Work", "order": 0, "isArchived": false,
        "createdAt": "2024-03-01T10:00:00.000Z", "updatedAt": "2024-03-01 10:00:00"
    }))
    .unwrap();
    let numeric: Space = serde_json::from_value(json!({
        "id": "s1", "userId": "u1", "name": "Work", "order": 0, "isArchived": false,
        "createdAt": 1709287200000i64, "updatedAt": 1709287200000i64
    }))
    .unwrap();
    assert_eq!(textual, numeric);
    assert_eq!(textual.created_at, Timestamp::from_millis(1_709_287_200_000));
}

#[rstest]
#[case::huge_float(json!(9e18))]
#[case::overflowing_float(json!(1e300))]
#[case::negative_float(json!(-9e18))]
#[case::max_integer(json!(i64::MAX))]
fn test_space_rejects_out_of_range_millis(#[case] created_at: Value) {
    let err = serde_json::from_value::<Space>(json!({
        "id": "s1", "userId": "u1", "name": "Work", "order": 0, "isArchived": false,
        "createdAt": created_at, "updatedAt": 0
    }))
    .unwrap_err();
    assert!(err.to_string().contains("out of range"), "{}", err);
}

#[test]
fn test_group_serializes_camel_case() {
    let group = Group {
        id: "g1".into(),
        user_id: "u1".into(),
        space_id: "s1".into(),
        name: "Docs".into(),
        icon: None,
        order: 2,
        is_archived: false,
        created_at: Timestamp::from_millis(0),
        updated_at: Timestamp::from_millis(0),
    };
    let value = serde_json::to_value(&group).unwrap();
    assert_eq!(value["spaceId"], "s1");
    assert_eq!(value["isArchived"], false);
    assert_eq!(value["createdAt"], "1970-01-01T00:00:00.000Z");
}

#[test]
fn test_bookmark_optional_fields_default() {
    let bookmark: Bookmark = serde_json::from_value(json!({
        "id": "b1", "userId": "u1", "spaceId": "s1", "groupId": "g1",
        "title": "Rust", "url": "https://rust-lang.org", "order": 0,
        "isPinned": false, "isArchived": false,
        "createdAt": 0, "updatedAt": 0
    }))
    .unwrap();
    assert!(bookmark.description.is_none());
    assert!(bookmark.favicon_url.is_none());
}
