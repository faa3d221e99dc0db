use std::sync::Arc;

use serde_json::Value;

use crate::{
    client::{DraftApi, SubmissionApi},
    drafts::{DraftConfig, DraftFlow, DraftSessionManager, DraftSnapshot, LoadOutcome},
    dto::{
        auxiliary::AuxiliaryForm,
        reservations::{NewReservation, ReservationConfirmation},
    },
    storage::KeyValueStore,
};

use super::{FieldError, FlowError, ReviewForm, ReviewStage};

pub const BOOKING_REQUIRED_FIELDS: &[&str] = &["name", "phone", "date", "time", "party_size"];

/// Reservation form with autosave, an optional waiver and a confirm step.
#[derive(Debug)]
pub struct BookingFlow<A, P, S> {
    form: ReviewForm<A, S>,
    submissions: Arc<P>,
}

impl<A, P, S> BookingFlow<A, P, S>
where
    A: DraftApi + 'static,
    P: SubmissionApi,
    S: KeyValueStore,
{
    pub fn new(drafts: Arc<A>, submissions: Arc<P>, session_storage: S, config: DraftConfig) -> Self {
        let drafts = DraftSessionManager::new(DraftFlow::Booking, drafts, session_storage, config);
        Self {
            form: ReviewForm::new(drafts, BOOKING_REQUIRED_FIELDS),
            submissions,
        }
    }

    pub fn form(&self) -> &ReviewForm<A, S> {
        &self.form
    }

    pub fn stage(&self) -> ReviewStage {
        self.form.stage()
    }

    /// Loads any saved draft and merges it into the form.
    pub async fn mount(&mut self) -> LoadOutcome {
        self.form.mount().await
    }

    pub fn set_field(&mut self, field: &str, value: impl Into<Value>) {
        self.form.set_field(field, value.into());
        let snapshot = DraftSnapshot::form(self.form.values().clone());
        self.form.drafts.record_change(snapshot);
    }

    /// Holds a waiver (or similar) locally until the booking is confirmed.
    pub fn attach_auxiliary(&mut self, form: AuxiliaryForm) {
        self.form.attach_auxiliary(form);
    }

    pub fn review(&mut self) -> Result<(), FlowError> {
        let extra = party_size_errors(self.form.values().get("party_size"));
        self.form.review(extra)
    }

    pub fn edit(&mut self) {
        self.form.edit();
    }

    pub fn cancel(&mut self) {
        self.form.cancel();
    }

    /// Submits the waiver (best-effort), then the reservation. On failure the
    /// flow stays in review with the draft intact.
    pub async fn confirm(&mut self) -> Result<ReservationConfirmation, FlowError> {
        self.form.ensure_reviewing()?;
        self.form.drafts.begin_submit();
        self.form.submit_auxiliary(&*self.submissions).await;

        let reservation = NewReservation {
            session_id: self.form.drafts.session_id().cloned(),
            details: self.form.values().clone(),
        };

        match self.submissions.create_reservation(&reservation).await {
            Ok(confirmation) => {
                tracing::info!(reference = %confirmation.reference, "reservation confirmed");
                self.form.committed().await;
                Ok(confirmation)
            }
            Err(err) => Err(self.form.submission_failed(err)),
        }
    }
}

fn party_size_errors(value: Option<&Value>) -> Vec<FieldError> {
    let size = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) if s.trim().is_empty() => return Vec::new(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };
    match size {
        Some(size) if size > 0 => Vec::new(),
        _ => vec![FieldError::new("party_size", "Party size must be at least 1")],
    }
}
