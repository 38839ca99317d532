//! Integration tests for room resolution and message routing: broadcast,
//! class, and direct scopes, feed ordering, and presence markers.

mod common;
use common::{new_student, seeded_store};

use studyhall::Store;
use studyhall::auth::NewUser;
use studyhall::error::ChatError;
use studyhall::rooms::{BROADCAST_ROOM_ID, RoomKey};

#[test]
fn broadcast_reaches_every_member() {
    let (store, a, b, c) = seeded_store();

    let members = store.room_members(&a, &RoomKey::Broadcast);
    assert_eq!(members.len(), 3);

    store.publish(&a, &RoomKey::Broadcast, "welcome all").unwrap();
    for viewer in [&a, &b, &c] {
        let feed = store.viewer_feed(viewer, &RoomKey::Broadcast).unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].room_id, BROADCAST_ROOM_ID);
    }
}

#[test]
fn class_rooms_partition_by_stage_and_grade() {
    let (store, a, b, _) = seeded_store();
    let other = store
        .register(NewUser {
            stage: Some("primary".into()),
            grade: Some("year-5".into()),
            ..new_student("Dana", "d@x.com")
        })
        .unwrap();

    let class = RoomKey::class(Some("secondary"), Some("year-2"));
    let members = store.room_members(&a, &class);
    assert!(members.contains(&a) && members.contains(&b));
    assert!(!members.contains(&other.id));

    store.publish(&a, &class, "class notes").unwrap();

    // Visible through the class key, not through other scopes.
    assert_eq!(store.viewer_feed(&b, &class).unwrap().len(), 1);
    assert!(store.viewer_feed(&b, &RoomKey::Broadcast).unwrap().is_empty());
    let other_class = RoomKey::class(Some("primary"), Some("year-5"));
    assert!(store.viewer_feed(&other.id, &other_class).unwrap().is_empty());
}

#[test]
fn direct_conversations_are_two_way_and_private() {
    let (store, a, b, c) = seeded_store();

    store.publish(&a, &RoomKey::direct(&b), "hi bilal").unwrap();
    store.publish(&b, &RoomKey::direct(&a), "hi alice").unwrap();

    // Both sides see both directions, in insertion order.
    let a_view = store.viewer_feed(&a, &RoomKey::direct(&b)).unwrap();
    let b_view = store.viewer_feed(&b, &RoomKey::direct(&a)).unwrap();
    assert_eq!(a_view.len(), 2);
    assert_eq!(
        a_view.iter().map(|m| m.text.as_str()).collect::<Vec<_>>(),
        vec!["hi bilal", "hi alice"]
    );
    assert_eq!(a_view, b_view);

    // A third party's direct view with either participant stays empty.
    assert!(store.viewer_feed(&c, &RoomKey::direct(&a)).unwrap().is_empty());
    assert!(store.viewer_feed(&c, &RoomKey::direct(&b)).unwrap().is_empty());

    let members = store.room_members(&a, &RoomKey::direct(&b));
    assert_eq!(members.len(), 2);
}

#[test]
fn direct_publish_requires_an_existing_counterpart() {
    let (store, a, _, _) = seeded_store();
    assert!(matches!(
        store
            .publish(&a, &RoomKey::direct("missing"), "anyone?")
            .unwrap_err(),
        ChatError::UnknownUser(_)
    ));
}

#[test]
fn publish_rejects_blank_text() {
    let (store, a, _, _) = seeded_store();
    assert!(matches!(
        store.publish(&a, &RoomKey::Broadcast, "   ").unwrap_err(),
        ChatError::NoTextToSend
    ));
}

#[test]
fn feeds_preserve_insertion_order() {
    let (store, a, b, _) = seeded_store();
    for text in ["one", "two", "three"] {
        store.publish(&a, &RoomKey::Broadcast, text).unwrap();
    }
    let feed = store.viewer_feed(&b, &RoomKey::Broadcast).unwrap();
    assert_eq!(
        feed.iter().map(|m| m.text.as_str()).collect::<Vec<_>>(),
        vec!["one", "two", "three"]
    );
}

#[test]
fn unassigned_students_still_resolve_a_class_room() {
    let store = Store::in_memory();
    let drifter = store
        .register(NewUser {
            stage: None,
            grade: None,
            ..new_student("Drifter", "drifter@x.com")
        })
        .unwrap();

    let class = RoomKey::class(None, None);
    assert_eq!(class.canonical_id(), "unassigned_unassigned");
    assert_eq!(store.room_members(&drifter.id, &class), vec![drifter.id.clone()]);

    store.publish(&drifter.id, &class, "anyone here?").unwrap();
    assert_eq!(store.viewer_feed(&drifter.id, &class).unwrap().len(), 1);
}

#[test]
fn presence_marker_follows_enter_and_leave() {
    let (store, a, _, _) = seeded_store();
    let class = RoomKey::class(Some("secondary"), Some("year-2"));

    store.enter_room(&a, &class).unwrap();
    let users = store.list_users();
    let alice = users.iter().find(|u| u.id == a).unwrap();
    assert_eq!(alice.current_room.as_deref(), Some("secondary_year-2"));

    store.leave_room(&a).unwrap();
    let users = store.list_users();
    let alice = users.iter().find(|u| u.id == a).unwrap();
    assert!(alice.current_room.is_none());

    assert!(matches!(
        store.enter_room("missing", &class).unwrap_err(),
        ChatError::UnknownUser(_)
    ));
}
