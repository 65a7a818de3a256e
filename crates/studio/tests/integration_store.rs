//! Integration tests for the scene store and its undo/redo history.
//!
//! Walks the editing scenarios end to end through the public store API.

use conceivin_studio_lib::fixtures::*;
use conceivin_studio_lib::state::SceneStore;
use shared::{Axis, ObjectType, MIN_SCALE};

#[test]
fn test_add_sphere_to_default_store() {
    let mut store = SceneStore::new();
    let id = store.add_object(ObjectType::Sphere);

    assert_eq!(store.objects().len(), 2);
    assert_eq!(store.get(&id).unwrap().kind, ObjectType::Sphere);
    assert_eq!(store.selected_id(), Some(&id));
    assert_eq!(store.history_index(), 0);
}

#[test]
fn test_recolor_then_undo_twice_restores_original() {
    let mut store = SceneStore::new();
    let original = store.objects().to_vec();
    let id = store.add_object(ObjectType::Sphere);

    assert!(store.update_color("#ff0000"));
    assert_eq!(store.get(&id).unwrap().color, "#ff0000");
    assert_eq!(store.history_index(), 1);
    assert_eq!(store.history().len(), 2);

    store.undo();
    store.undo();
    assert_eq!(store.objects(), original.as_slice());
    assert_eq!(store.history_index(), -1);
}

#[test]
fn test_delete_without_selection_changes_nothing() {
    let mut store = SceneStore::new();
    let before = store.objects().to_vec();
    assert!(store.selected_id().is_none());

    assert!(!store.delete_selected());
    assert_eq!(store.objects(), before.as_slice());
    assert!(store.history().is_empty());
}

#[test]
fn test_ids_stay_unique() {
    let mut store = SceneStore::new();
    for kind in ObjectType::ALL.iter().filter(|k| k.is_creatable()).cycle().take(50) {
        store.add_object(*kind);
    }
    let mut ids: Vec<&str> = store.objects().iter().map(|o| o.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 51);
}

#[test]
fn test_scale_floor_is_exact() {
    let mut store = store_with(vec![box_at("a", [0.0; 3])]);
    store.select(Some("a"));
    for (axis, v) in [(Axis::X, 0.09), (Axis::Y, -1.0), (Axis::Z, 0.0)] {
        store.update_scale(axis, v);
    }
    assert_eq!(store.get("a").unwrap().scale, [MIN_SCALE; 3]);
}

#[test]
fn test_undo_redo_inverse_law() {
    let mut store = SceneStore::new();
    let start = store.objects().to_vec();

    let id = store.add_object(ObjectType::Cylinder);
    store.update_position(Axis::X, 1.5);
    store.update_rotation(Axis::Y, 0.25);
    store.update_scale(Axis::Z, 2.0);
    store.update_color("#abcdef");
    store.select(Some(&id));
    store.delete_selected();
    let end = store.objects().to_vec();
    let n = store.history().len();
    assert_eq!(n, 6);

    for _ in 0..n {
        assert!(store.undo());
    }
    assert_eq!(store.objects(), start.as_slice());

    for _ in 0..n {
        assert!(store.redo());
    }
    assert_eq!(store.objects(), end.as_slice());
}

#[test]
fn test_redo_truncated_by_new_edit() {
    let mut store = SceneStore::new();
    store.add_object(ObjectType::Box);
    store.add_object(ObjectType::Cone);
    store.undo();

    store.add_object(ObjectType::Torus);
    assert_eq!(store.history_index(), store.history().len() as isize - 1);
    let before = store.objects().to_vec();
    assert!(!store.redo());
    assert_eq!(store.objects(), before.as_slice());
    assert!(store.objects().iter().all(|o| o.kind != ObjectType::Cone));
}

#[test]
fn test_selection_never_dangles() {
    let mut store = store_with(vec![box_at("a", [0.0; 3]), sphere_at("b", [1.0; 3])]);
    store.select(Some("b"));
    store.delete_selected();
    assert!(store.selected_id().is_none());

    assert!(!store.select(Some("b")));
    assert!(store.selected_id().is_none());

    store.undo();
    assert!(store.contains("b"));
    assert!(store.select(Some("b")));
    store.redo();
    assert!(store.selected_id().is_none());
}

#[test]
fn test_unaffected_objects_compare_equal() {
    let mut store = store_with(vec![box_at("a", [0.0; 3]), box_at("b", [3.0, 0.0, 0.0])]);
    let b_before = store.get("b").cloned();
    store.select(Some("a"));
    store.update_position(Axis::Y, 9.0);
    store.update_color("#000000");
    assert_eq!(store.get("b").cloned(), b_before);
}

#[test]
fn test_history_limit_keeps_recent_steps() {
    let mut store = SceneStore::with_settings("#8b5cf6", 5);
    for i in 0..20 {
        store.add_object(ObjectType::Box);
        store.update_position(Axis::X, i as f64);
    }
    assert_eq!(store.history().len(), 5);
    let mut undone = 0;
    while store.undo() {
        undone += 1;
    }
    assert_eq!(undone, 5);
    assert_eq!(store.objects(), store.baseline());
}
