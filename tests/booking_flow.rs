mod common;

use std::{
    sync::{Arc, atomic::Ordering},
    time::Duration,
};

use axum_storefront_api::{
    drafts::{DraftFlow, DraftSnapshot, FormSnapshot},
    dto::auxiliary::AuxiliaryForm,
    flow::{BookingFlow, FlowError, ReviewStage},
    storage::MemoryStore,
};
use testresult::TestResult;

use common::{FakeDrafts, FakeSubmissions, config};

type Flow = BookingFlow<FakeDrafts, FakeSubmissions, Arc<MemoryStore>>;

struct Harness {
    drafts: Arc<FakeDrafts>,
    submissions: Arc<FakeSubmissions>,
    storage: Arc<MemoryStore>,
}

impl Harness {
    fn new() -> Self {
        Self {
            drafts: Arc::new(FakeDrafts::default()),
            submissions: Arc::new(FakeSubmissions::default()),
            storage: Arc::new(MemoryStore::new()),
        }
    }

    fn flow(&self) -> Flow {
        BookingFlow::new(
            self.drafts.clone(),
            self.submissions.clone(),
            self.storage.clone(),
            config(),
        )
    }
}

fn fill(flow: &mut Flow) {
    flow.set_field("name", "Ana");
    flow.set_field("phone", "+1 555 0100");
    flow.set_field("email", "ana@example.com");
    flow.set_field("date", "2026-11-02");
    flow.set_field("time", "19:30");
    flow.set_field("party_size", 4);
}

fn waiver() -> AuxiliaryForm {
    AuxiliaryForm {
        kind: "waiver".to_string(),
        fields: FormSnapshot::new().with("signed_by", "Ana"),
    }
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(1600)).await;
}

#[tokio::test(start_paused = true)]
async fn invalid_form_makes_no_network_call() {
    let h = Harness::new();
    let mut flow = h.flow();
    flow.set_field("name", "Ana");
    flow.set_field("email", "not-an-email");
    flow.set_field("party_size", 0);

    let Err(FlowError::Invalid(errors)) = flow.review() else {
        panic!("expected field errors");
    };
    let fields: Vec<&str> = errors.iter().map(|err| err.field.as_str()).collect();
    assert!(fields.contains(&"phone"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"party_size"));
    assert_eq!(flow.stage(), ReviewStage::Editing);
    assert_eq!(flow.form().field_errors().len(), errors.len());

    assert!(matches!(flow.confirm().await, Err(FlowError::NotReviewing)));
    assert_eq!(h.submissions.primary_calls(), 0);
    assert_eq!(h.submissions.auxiliary_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn confirmed_booking_clears_the_draft() -> TestResult {
    let h = Harness::new();
    let mut flow = h.flow();
    flow.mount().await;
    fill(&mut flow);
    flow.attach_auxiliary(waiver());
    settle().await;
    assert_eq!(h.drafts.len(), 1);

    flow.review()?;
    assert_eq!(flow.stage(), ReviewStage::Reviewing);
    let confirmation = flow.confirm().await?;

    assert_eq!(confirmation.reference, "RSV-TEST");
    assert_eq!(flow.stage(), ReviewStage::Committed);
    assert_eq!(h.drafts.len(), 0);
    assert_eq!(h.submissions.auxiliary_calls(), 1);
    assert!(flow.form().values().is_empty());

    let sent = h.submissions.reservations.lock().unwrap()[0].clone();
    assert_eq!(sent.details.text("name"), Some("Ana"));
    assert!(sent.session_id.is_some());

    let mut next = h.flow();
    next.mount().await;
    assert!(next.form().values().is_empty());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn waiver_failure_is_only_a_warning() -> TestResult {
    let h = Harness::new();
    h.submissions.fail_auxiliary.store(true, Ordering::SeqCst);
    let mut flow = h.flow();
    fill(&mut flow);
    flow.attach_auxiliary(waiver());

    flow.review()?;
    flow.confirm().await?;

    assert_eq!(flow.stage(), ReviewStage::Committed);
    assert_eq!(flow.form().warnings().len(), 1);
    assert!(flow.form().warnings()[0].contains("waiver"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn failed_reservation_keeps_draft_for_retry() -> TestResult {
    let h = Harness::new();
    h.submissions.fail_primary.store(true, Ordering::SeqCst);
    let mut flow = h.flow();
    fill(&mut flow);
    flow.attach_auxiliary(waiver());
    settle().await;

    flow.review()?;
    let err = flow.confirm().await.unwrap_err();

    assert!(matches!(err, FlowError::Submission(_)));
    assert_eq!(flow.stage(), ReviewStage::Reviewing);
    assert_eq!(h.drafts.len(), 1);
    assert_eq!(flow.form().values().text("name"), Some("Ana"));
    assert!(flow.form().drafts().last_error().is_some());

    h.submissions.fail_primary.store(false, Ordering::SeqCst);
    flow.confirm().await?;

    assert_eq!(h.submissions.primary_calls(), 2);
    assert_eq!(h.submissions.auxiliary_calls(), 1);
    assert_eq!(h.drafts.len(), 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn edit_returns_to_the_form_with_values() -> TestResult {
    let h = Harness::new();
    let mut flow = h.flow();
    fill(&mut flow);

    flow.review()?;
    flow.edit();

    assert_eq!(flow.stage(), ReviewStage::Editing);
    assert_eq!(flow.form().values().text("time"), Some("19:30"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn cancel_leaves_the_remote_draft() {
    let h = Harness::new();
    let mut flow = h.flow();
    fill(&mut flow);
    settle().await;

    flow.cancel();

    assert_eq!(flow.stage(), ReviewStage::Cancelled);
    assert!(flow.form().values().is_empty());
    assert_eq!(h.drafts.len(), 1);
    assert_eq!(h.drafts.deletes.load(Ordering::SeqCst), 0);

    let mut resumed = h.flow();
    resumed.mount().await;
    assert_eq!(resumed.form().values().text("name"), Some("Ana"));
}

#[tokio::test(start_paused = true)]
async fn saved_draft_is_merged_on_mount() {
    let h = Harness::new();
    let session_id = {
        let mut flow = h.flow();
        flow.mount().await;
        flow.form().drafts().session_id().cloned().expect("session id")
    };
    h.drafts.seed(
        DraftFlow::Booking,
        &session_id,
        DraftSnapshot::form(FormSnapshot::new().with("phone", "555").with("party_size", 2)),
    );

    let mut flow = h.flow();
    flow.mount().await;

    assert_eq!(flow.form().values().text("phone"), Some("555"));
    assert!(flow.form().load_notice().is_none());
}

#[tokio::test(start_paused = true)]
async fn unavailable_draft_store_sets_a_notice() {
    let h = Harness::new();
    h.drafts.fail_get.store(true, Ordering::SeqCst);
    let mut flow = h.flow();

    flow.mount().await;

    assert!(flow.form().load_notice().is_some());
    assert_eq!(flow.stage(), ReviewStage::Editing);
}
