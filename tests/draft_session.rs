mod common;

use std::{
    sync::{Arc, atomic::Ordering},
    time::Duration,
};

use axum_storefront_api::{
    drafts::{
        DraftConfig, DraftFlow, DraftPhase, DraftSessionManager, DraftSnapshot, FormSnapshot,
        LoadOutcome, SaveState,
    },
    storage::MemoryStore,
};
use testresult::TestResult;

use common::{FakeDrafts, config};

type Manager = DraftSessionManager<FakeDrafts, Arc<MemoryStore>>;

fn manager(api: &Arc<FakeDrafts>, storage: &Arc<MemoryStore>) -> Manager {
    DraftSessionManager::new(DraftFlow::Booking, api.clone(), storage.clone(), config())
}

fn snapshot(name: &str, phone: &str) -> DraftSnapshot {
    DraftSnapshot::form(FormSnapshot::new().with("name", name).with("phone", phone))
}

/// Long enough for the debounce timer and the detached save to run.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1600)).await;
}

#[tokio::test(start_paused = true)]
async fn nothing_is_saved_without_a_phone() {
    let api = Arc::new(FakeDrafts::default());
    let mut drafts = manager(&api, &Arc::new(MemoryStore::new()));

    drafts.record_change(snapshot("Ana", ""));
    drafts.record_change(snapshot("Ana", "   "));
    settle().await;

    assert_eq!(api.save_count(), 0);
    assert_eq!(drafts.status().borrow().state, SaveState::Idle);
}

#[tokio::test(start_paused = true)]
async fn rapid_changes_send_only_the_last_snapshot() {
    let api = Arc::new(FakeDrafts::default());
    let mut drafts = manager(&api, &Arc::new(MemoryStore::new()));

    drafts.record_change(snapshot("A", "555"));
    tokio::time::sleep(Duration::from_millis(500)).await;
    drafts.record_change(snapshot("An", "555"));
    tokio::time::sleep(Duration::from_millis(1000)).await;
    drafts.record_change(snapshot("Ana", "555"));
    assert_eq!(api.save_count(), 0);

    settle().await;

    assert_eq!(api.save_count(), 1);
    assert_eq!(api.last_saved(), Some(snapshot("Ana", "555")));
    assert_eq!(drafts.phase(), DraftPhase::Editing);
}

#[tokio::test(start_paused = true)]
async fn save_status_clears_after_a_while() {
    let api = Arc::new(FakeDrafts::default());
    let mut drafts = manager(&api, &Arc::new(MemoryStore::new()));
    let status = drafts.status();

    drafts.record_change(snapshot("Ana", "555"));
    settle().await;
    assert_eq!(status.borrow().state, SaveState::Saved);

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(status.borrow().state, SaveState::Idle);
}

#[tokio::test(start_paused = true)]
async fn failed_save_reports_error_and_keeps_editing() {
    let api = Arc::new(FakeDrafts::default());
    api.fail_save.store(true, Ordering::SeqCst);
    let mut drafts = manager(&api, &Arc::new(MemoryStore::new()));
    let status = drafts.status();

    drafts.record_change(snapshot("Ana", "555"));
    settle().await;

    assert_eq!(status.borrow().state, SaveState::Error);
    assert_eq!(drafts.phase(), DraftPhase::Editing);

    api.fail_save.store(false, Ordering::SeqCst);
    drafts.record_change(snapshot("Ana B", "555"));
    settle().await;

    assert_eq!(status.borrow().state, SaveState::Saved);
    assert_eq!(api.save_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn draft_is_restored_in_a_new_manager() {
    let api = Arc::new(FakeDrafts::default());
    let storage = Arc::new(MemoryStore::new());

    let mut first = manager(&api, &storage);
    first.record_change(snapshot("Ana", "555"));
    settle().await;
    first.record_change(snapshot("Ana Maria", "555"));
    settle().await;
    let session_id = first.session_id().cloned();
    drop(first);

    assert_eq!(api.len(), 1);

    let mut second = manager(&api, &storage);
    let outcome = second.mount().await;

    assert_eq!(outcome, LoadOutcome::Loaded(snapshot("Ana Maria", "555")));
    assert_eq!(second.phase(), DraftPhase::Loaded);
    assert_eq!(second.session_id().cloned(), session_id);
}

#[tokio::test(start_paused = true)]
async fn missing_draft_mounts_empty() {
    let api = Arc::new(FakeDrafts::default());
    let mut drafts = manager(&api, &Arc::new(MemoryStore::new()));

    assert_eq!(drafts.mount().await, LoadOutcome::Empty);
    assert_eq!(drafts.phase(), DraftPhase::Empty);
    assert!(drafts.last_error().is_none());
    assert!(drafts.session_id().is_some());
}

#[tokio::test(start_paused = true)]
async fn load_failure_is_reported_as_unavailable() {
    let api = Arc::new(FakeDrafts::default());
    api.fail_get.store(true, Ordering::SeqCst);
    let mut drafts = manager(&api, &Arc::new(MemoryStore::new()));

    assert_eq!(drafts.mount().await, LoadOutcome::Unavailable);

    drafts.record_change(snapshot("Ana", "555"));
    settle().await;
    assert_eq!(api.save_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn commit_deletes_the_draft_and_rotates_the_session() -> TestResult {
    let api = Arc::new(FakeDrafts::default());
    let storage = Arc::new(MemoryStore::new());
    let mut drafts = manager(&api, &storage);

    drafts.record_change(snapshot("Ana", "555"));
    assert!(drafts.flush().await?);
    let old_id = drafts.session_id().cloned().expect("session id");

    drafts.begin_submit();
    drafts.commit().await;

    assert_eq!(drafts.phase(), DraftPhase::Committed);
    assert!(api.stored(DraftFlow::Booking, &old_id).is_none());

    let mut next = manager(&api, &storage);
    assert_eq!(next.mount().await, LoadOutcome::Empty);
    assert_ne!(next.session_id(), Some(&old_id));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn commit_succeeds_when_delete_fails() -> TestResult {
    let api = Arc::new(FakeDrafts::default());
    api.fail_delete.store(true, Ordering::SeqCst);
    let storage = Arc::new(MemoryStore::new());
    let mut drafts = manager(&api, &storage);

    drafts.record_change(snapshot("Ana", "555"));
    drafts.flush().await?;
    let old_id = drafts.session_id().cloned().expect("session id");

    drafts.commit().await;

    assert_eq!(drafts.phase(), DraftPhase::Committed);
    assert_eq!(api.deletes.load(Ordering::SeqCst), 1);
    assert!(drafts.session_id().is_none());
    assert_ne!(manager(&api, &storage).ensure_session(), old_id);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn flush_saves_now_and_cancels_the_timer() -> TestResult {
    let api = Arc::new(FakeDrafts::default());
    let mut drafts = manager(&api, &Arc::new(MemoryStore::new()));

    drafts.record_change(snapshot("Ana", "555"));
    assert!(drafts.flush().await?);
    settle().await;

    assert_eq!(api.save_count(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn failed_submission_reschedules_held_back_autosave() {
    let api = Arc::new(FakeDrafts::default());
    let mut drafts = manager(&api, &Arc::new(MemoryStore::new()));

    drafts.record_change(snapshot("Ana", "555"));
    drafts.begin_submit();
    assert_eq!(drafts.phase(), DraftPhase::Submitting);
    settle().await;
    assert_eq!(api.save_count(), 0);

    drafts.submit_failed("network down");
    assert_eq!(drafts.phase(), DraftPhase::Editing);
    assert_eq!(drafts.last_error(), Some("network down"));
    settle().await;

    assert_eq!(api.save_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn abandon_keeps_the_remote_draft() -> TestResult {
    let api = Arc::new(FakeDrafts::default());
    let storage = Arc::new(MemoryStore::new());
    let mut drafts = manager(&api, &storage);

    drafts.record_change(snapshot("Ana", "555"));
    drafts.flush().await?;
    drafts.record_change(snapshot("Ana B", "555"));
    drafts.abandon();
    settle().await;

    assert_eq!(api.save_count(), 1);
    assert_eq!(drafts.phase(), DraftPhase::Uninitialized);

    let mut resumed = manager(&api, &storage);
    assert_eq!(resumed.mount().await, LoadOutcome::Loaded(snapshot("Ana", "555")));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn commit_waits_for_a_save_in_flight() {
    let api = Arc::new(FakeDrafts::default());
    api.save_delay_ms.store(200, Ordering::SeqCst);
    let mut drafts = manager(&api, &Arc::new(MemoryStore::new()));

    drafts.record_change(snapshot("Ana", "555"));
    settle().await;
    assert_eq!(api.save_count(), 1);
    let session_id = drafts.session_id().cloned().expect("session id");

    drafts.begin_submit();
    drafts.commit().await;
    assert!(api.stored(DraftFlow::Booking, &session_id).is_none());

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(api.stored(DraftFlow::Booking, &session_id).is_none());
    assert_eq!(api.deletes.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn queued_saves_land_before_the_commit_delete() {
    let api = Arc::new(FakeDrafts::default());
    api.save_delay_ms.store(200, Ordering::SeqCst);
    let mut drafts = DraftSessionManager::new(
        DraftFlow::Booking,
        api.clone(),
        Arc::new(MemoryStore::new()),
        DraftConfig {
            debounce: Duration::from_millis(100),
            ..config()
        },
    );

    // First save runs from 100ms to 300ms.
    drafts.record_change(snapshot("Ana", "555"));
    tokio::time::sleep(Duration::from_millis(150)).await;
    let session_id = drafts.session_id().cloned().expect("session id");

    // Second save fires at 250ms and waits behind the first.
    drafts.record_change(snapshot("Ana B", "555"));
    tokio::time::sleep(Duration::from_millis(110)).await;

    drafts.begin_submit();
    drafts.commit().await;
    assert_eq!(api.save_count(), 2);
    assert!(api.stored(DraftFlow::Booking, &session_id).is_none());

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert!(api.stored(DraftFlow::Booking, &session_id).is_none());
    assert_eq!(api.save_count(), 2);
}
