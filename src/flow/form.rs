use serde_json::Value;

use crate::{
    client::{ClientError, DraftApi, SubmissionApi},
    drafts::{DraftSessionManager, FormSnapshot, LoadOutcome},
    dto::auxiliary::AuxiliaryForm,
    storage::KeyValueStore,
};

use super::{FieldError, FlowError, ReviewStage};

/// Form state shared by the booking and checkout flows.
#[derive(Debug)]
pub struct ReviewForm<A, S> {
    pub(crate) drafts: DraftSessionManager<A, S>,
    values: FormSnapshot,
    auxiliary: Option<AuxiliaryForm>,
    auxiliary_sent: bool,
    stage: ReviewStage,
    required: &'static [&'static str],
    warnings: Vec<String>,
    field_errors: Vec<FieldError>,
    load_notice: Option<String>,
}

impl<A, S> ReviewForm<A, S>
where
    A: DraftApi + 'static,
    S: KeyValueStore,
{
    pub(crate) fn new(drafts: DraftSessionManager<A, S>, required: &'static [&'static str]) -> Self {
        Self {
            drafts,
            values: FormSnapshot::new(),
            auxiliary: None,
            auxiliary_sent: false,
            stage: ReviewStage::Editing,
            required,
            warnings: Vec::new(),
            field_errors: Vec::new(),
            load_notice: None,
        }
    }

    pub fn stage(&self) -> ReviewStage {
        self.stage
    }

    pub fn values(&self) -> &FormSnapshot {
        &self.values
    }

    pub fn auxiliary(&self) -> Option<&AuxiliaryForm> {
        self.auxiliary.as_ref()
    }

    /// Problems from best-effort steps that did not stop the flow.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    /// Set when a saved draft could not be loaded.
    pub fn load_notice(&self) -> Option<&str> {
        self.load_notice.as_deref()
    }

    pub fn drafts(&self) -> &DraftSessionManager<A, S> {
        &self.drafts
    }

    pub(crate) async fn mount(&mut self) -> LoadOutcome {
        let outcome = self.drafts.mount().await;
        match &outcome {
            LoadOutcome::Loaded(snapshot) => self.values.merge(&snapshot.form),
            LoadOutcome::Unavailable => {
                self.load_notice = Some("Could not load your saved progress".to_string());
            }
            LoadOutcome::Empty => {}
        }
        self.stage = ReviewStage::Editing;
        outcome
    }

    pub(crate) fn set_field(&mut self, field: &str, value: Value) {
        self.values.set(field, value);
        self.field_errors.retain(|err| err.field != field);
        if self.stage == ReviewStage::Cancelled {
            self.stage = ReviewStage::Editing;
        }
    }

    pub(crate) fn attach_auxiliary(&mut self, form: AuxiliaryForm) {
        self.auxiliary = Some(form);
        self.auxiliary_sent = false;
    }

    /// Checks required fields and moves to review. Nothing is sent.
    pub(crate) fn review(&mut self, extra: Vec<FieldError>) -> Result<(), FlowError> {
        let mut errors: Vec<FieldError> = self
            .required
            .iter()
            .filter(|field| !self.values.is_filled(field))
            .map(|field| FieldError::new(*field, "This field is required"))
            .collect();

        if let Some(email) = self.values.text("email") {
            if !email.is_empty() && !email.contains('@') {
                errors.push(FieldError::new("email", "Enter a valid email address"));
            }
        }
        errors.extend(extra);

        if !errors.is_empty() {
            self.stage = ReviewStage::Editing;
            self.field_errors = errors.clone();
            return Err(FlowError::Invalid(errors));
        }

        self.field_errors.clear();
        self.stage = ReviewStage::Reviewing;
        Ok(())
    }

    pub(crate) fn edit(&mut self) {
        if self.stage == ReviewStage::Reviewing {
            self.stage = ReviewStage::Editing;
        }
    }

    pub(crate) fn cancel(&mut self) {
        self.drafts.abandon();
        self.values.clear();
        self.auxiliary = None;
        self.auxiliary_sent = false;
        self.warnings.clear();
        self.field_errors.clear();
        self.stage = ReviewStage::Cancelled;
    }

    pub(crate) fn ensure_reviewing(&self) -> Result<(), FlowError> {
        if self.stage == ReviewStage::Reviewing {
            Ok(())
        } else {
            Err(FlowError::NotReviewing)
        }
    }

    /// Sends the auxiliary form once. A failure becomes a warning.
    pub(crate) async fn submit_auxiliary<P: SubmissionApi>(&mut self, api: &P) {
        if self.auxiliary_sent {
            return;
        }
        let Some(form) = self.auxiliary.as_ref() else {
            return;
        };
        let flow = self.drafts.flow();
        let session_id = self.drafts.ensure_session();

        match api.submit_auxiliary_form(flow, &session_id, form).await {
            Ok(()) => {
                tracing::debug!(flow = %flow, kind = %form.kind, "auxiliary form submitted");
                self.auxiliary_sent = true;
            }
            Err(err) => {
                tracing::warn!(flow = %flow, kind = %form.kind, error = %err, "auxiliary form failed");
                self.warnings
                    .push(format!("Your {} could not be submitted: {err}", form.kind));
            }
        }
    }

    pub(crate) fn submission_failed(&mut self, err: ClientError) -> FlowError {
        tracing::warn!(flow = %self.drafts.flow(), error = %err, "submission failed");
        self.drafts.submit_failed(err.to_string());
        FlowError::Submission(err)
    }

    pub(crate) async fn committed(&mut self) {
        self.drafts.commit().await;
        self.values.clear();
        self.auxiliary = None;
        self.auxiliary_sent = false;
        self.field_errors.clear();
        self.load_notice = None;
        self.stage = ReviewStage::Committed;
    }
}
