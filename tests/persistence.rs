//! Integration tests for snapshot persistence: every mutation is saved,
//! and a reopened store observes the same users, messages, reports, and
//! session.

mod common;
use common::new_student;

use studyhall::Store;
use studyhall::db::SnapshotStore;
use studyhall::rooms::RoomKey;
use studyhall::state::report::{ReportCause, ReportTarget};
use studyhall::state::store::RegistrationPolicy;

#[test]
fn reopened_store_observes_all_collections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studyhall.redb");

    let (a_id, b_id, report_id) = {
        let snapshots = SnapshotStore::open(&path).unwrap();
        let store = Store::open(snapshots, RegistrationPolicy::default()).unwrap();

        let a = store.register(new_student("Alice", "a@x.com")).unwrap();
        let b = store.register(new_student("Bilal", "b@x.com")).unwrap();
        store.block_user(&a.id, &b.id).unwrap();
        store.publish(&b.id, &RoomKey::Broadcast, "hello").unwrap();
        let report = store
            .file_report(
                &a.id,
                ReportTarget::User(b.id.clone()),
                ReportCause::Spam,
                None,
            )
            .unwrap();
        store.authenticate("a@x.com", "password1").unwrap();

        (a.id, b.id, report.id)
    };

    let snapshots = SnapshotStore::open(&path).unwrap();
    let store = Store::open(snapshots, RegistrationPolicy::default()).unwrap();

    let stats = store.stats();
    assert_eq!(stats.users, 2);
    assert_eq!(stats.messages, 1);
    assert_eq!(stats.reports, 1);

    // The persisted session comes back.
    let session = store.session_user().expect("session survives reopen");
    assert_eq!(session.id, a_id);

    // The reloaded block list still filters the feed.
    assert!(store.viewer_feed(&a_id, &RoomKey::Broadcast).unwrap().is_empty());
    assert_eq!(store.viewer_feed(&b_id, &RoomKey::Broadcast).unwrap().len(), 1);

    // The report ledger reloaded with its id intact.
    assert!(store.list_reports().iter().any(|r| r.id == report_id));

    // Stored hashes keep verifying after reload.
    store
        .authenticate("b@x.com", "password1")
        .expect("reloaded credentials verify");
}

#[test]
fn logout_persists_the_cleared_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studyhall.redb");

    {
        let snapshots = SnapshotStore::open(&path).unwrap();
        let store = Store::open(snapshots, RegistrationPolicy::default()).unwrap();
        store.register(new_student("Alice", "a@x.com")).unwrap();
        store.authenticate("a@x.com", "password1").unwrap();
        store.logout();
    }

    let snapshots = SnapshotStore::open(&path).unwrap();
    let store = Store::open(snapshots, RegistrationPolicy::default()).unwrap();
    assert!(store.session_user().is_none());
}

#[test]
fn sanctions_survive_reopen() {
    use studyhall::error::AuthError;
    use studyhall::state::user::SanctionKind;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studyhall.redb");

    {
        let snapshots = SnapshotStore::open(&path).unwrap();
        let store = Store::open(snapshots, RegistrationPolicy::default()).unwrap();
        let a = store.register(new_student("Alice", "a@x.com")).unwrap();
        store
            .apply_sanction(&a.id, SanctionKind::Ban, "abuse")
            .unwrap();
    }

    let snapshots = SnapshotStore::open(&path).unwrap();
    let store = Store::open(snapshots, RegistrationPolicy::default()).unwrap();
    assert!(matches!(
        store.authenticate("a@x.com", "password1").unwrap_err(),
        AuthError::Banned
    ));
}
