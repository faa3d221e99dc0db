use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::{
    sync::{Mutex, watch},
    task::JoinHandle,
};

use crate::{
    client::{ClientError, ClientResult, DraftApi},
    storage::KeyValueStore,
};

use super::{
    config::DraftConfig,
    session::SessionSlot,
    snapshot::{DraftFlow, DraftSnapshot, SessionId},
    status::{self, SaveState, SaveStatus},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftPhase {
    Uninitialized,
    Loading,
    Empty,
    Loaded,
    Editing,
    Submitting,
    Committed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(DraftSnapshot),
    Empty,
    /// The draft store failed; the form is still usable.
    Unavailable,
}

/// Drives one flow's draft: session id, load on mount, debounced autosave
/// and cleanup after a successful submission.
///
/// Autosaves run on spawned tasks and must be driven from inside a tokio
/// runtime.
#[derive(Debug)]
pub struct DraftSessionManager<A, S> {
    flow: DraftFlow,
    api: Arc<A>,
    slot: SessionSlot<S>,
    config: DraftConfig,
    phase: DraftPhase,
    session_id: Option<SessionId>,
    latest: Option<DraftSnapshot>,
    pending: Option<JoinHandle<()>>,
    unsaved: bool,
    status: watch::Sender<SaveStatus>,
    seq: Arc<AtomicU64>,
    /// Held for the duration of every save and of the commit delete. The
    /// value is the session generation; saves scheduled under an older one
    /// are dropped.
    save_lock: Arc<Mutex<u64>>,
    generation: u64,
    last_error: Option<String>,
}

impl<A, S> DraftSessionManager<A, S>
where
    A: DraftApi + 'static,
    S: KeyValueStore,
{
    pub fn new(flow: DraftFlow, api: Arc<A>, session_storage: S, config: DraftConfig) -> Self {
        let (status, _) = watch::channel(SaveStatus::default());
        Self {
            flow,
            api,
            slot: SessionSlot::new(flow, session_storage),
            config,
            phase: DraftPhase::Uninitialized,
            session_id: None,
            latest: None,
            pending: None,
            unsaved: false,
            status,
            seq: Arc::new(AtomicU64::new(0)),
            save_lock: Arc::new(Mutex::new(0)),
            generation: 0,
            last_error: None,
        }
    }

    pub fn flow(&self) -> DraftFlow {
        self.flow
    }

    pub fn phase(&self) -> DraftPhase {
        self.phase
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn config(&self) -> &DraftConfig {
        &self.config
    }

    /// Last submission error, kept until the next successful commit.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn status(&self) -> watch::Receiver<SaveStatus> {
        self.status.subscribe()
    }

    /// Resolves the session id and loads any draft saved under it.
    pub async fn mount(&mut self) -> LoadOutcome {
        let session_id = self.ensure_session();
        self.phase = DraftPhase::Loading;

        match self.api.get_draft(self.flow, &session_id).await {
            Ok(Some(snapshot)) => {
                tracing::info!(flow = %self.flow, session_id = %session_id, "draft restored");
                self.phase = DraftPhase::Loaded;
                self.latest = Some(snapshot.clone());
                LoadOutcome::Loaded(snapshot)
            }
            Ok(None) => {
                tracing::debug!(flow = %self.flow, session_id = %session_id, "no draft for session");
                self.phase = DraftPhase::Empty;
                LoadOutcome::Empty
            }
            Err(ClientError::NotFound(_)) => {
                self.phase = DraftPhase::Empty;
                LoadOutcome::Empty
            }
            Err(err) => {
                tracing::warn!(
                    flow = %self.flow,
                    session_id = %session_id,
                    error = %err,
                    "could not load draft"
                );
                self.phase = DraftPhase::Empty;
                LoadOutcome::Unavailable
            }
        }
    }

    /// Records the current form state and restarts the autosave timer.
    /// Only the snapshot from the last call before the timer fires is sent.
    pub fn record_change(&mut self, snapshot: DraftSnapshot) {
        let session_id = self.ensure_session();
        if self.phase != DraftPhase::Submitting {
            self.phase = DraftPhase::Editing;
        }
        self.latest = Some(snapshot.clone());
        self.unsaved = true;
        self.cancel_timer();

        let api = Arc::clone(&self.api);
        let seq = Arc::clone(&self.seq);
        let status = self.status.clone();
        let config = self.config.clone();
        let flow = self.flow;
        let save = SaveGuard {
            lock: Arc::clone(&self.save_lock),
            generation: self.generation,
        };

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(config.debounce).await;
            // Detach the save so a later keystroke cannot cancel a request
            // that is already in flight.
            tokio::spawn(async move {
                let result =
                    autosave(&*api, flow, &session_id, &snapshot, &config, &seq, &status, &save)
                        .await;
                if let Err(err) = result {
                    tracing::trace!(flow = %flow, error = %err, "detached autosave finished with error");
                }
            });
        }));
    }

    /// Saves the latest snapshot now instead of waiting for the timer.
    /// Returns `false` when there was nothing worth saving.
    pub async fn flush(&mut self) -> ClientResult<bool> {
        self.cancel_timer();
        let (Some(session_id), Some(snapshot)) = (self.session_id.clone(), self.latest.clone())
        else {
            return Ok(false);
        };
        let save = SaveGuard {
            lock: Arc::clone(&self.save_lock),
            generation: self.generation,
        };
        let saved = autosave(
            &*self.api,
            self.flow,
            &session_id,
            &snapshot,
            &self.config,
            &self.seq,
            &self.status,
            &save,
        )
        .await?;
        if saved {
            self.unsaved = false;
        }
        Ok(saved)
    }

    pub fn begin_submit(&mut self) {
        self.unsaved = self.cancel_timer();
        self.phase = DraftPhase::Submitting;
    }

    /// The submission failed: back to editing, draft kept. Edits whose
    /// autosave was held back by the submission are rescheduled.
    pub fn submit_failed(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
        self.phase = DraftPhase::Editing;
        if self.unsaved {
            if let Some(snapshot) = self.latest.clone() {
                self.record_change(snapshot);
            }
        }
    }

    /// The submission succeeded: delete the remote draft (best-effort) and
    /// forget the session id so the next mount starts fresh.
    ///
    /// Waits for a save that is already in flight, so the delete always
    /// lands last. Saves that were scheduled but not yet started are dropped.
    pub async fn commit(&mut self) {
        self.cancel_timer();
        let mut generation = self.save_lock.lock().await;
        *generation += 1;
        self.generation = *generation;
        if let Some(session_id) = self.session_id.take() {
            if let Err(err) = self.api.delete_draft(self.flow, &session_id).await {
                tracing::warn!(
                    flow = %self.flow,
                    session_id = %session_id,
                    error = %err,
                    "draft delete failed after commit"
                );
            }
        }
        drop(generation);
        self.slot.discard();
        self.latest = None;
        self.unsaved = false;
        self.last_error = None;
        self.phase = DraftPhase::Committed;
    }

    /// Drops local state and any pending autosave. The remote draft and the
    /// stored session id stay so the flow can be resumed later.
    pub fn abandon(&mut self) {
        self.cancel_timer();
        self.latest = None;
        self.unsaved = false;
        self.phase = DraftPhase::Uninitialized;
    }

    /// The current session id, read from or created in the session slot.
    pub fn ensure_session(&mut self) -> SessionId {
        match &self.session_id {
            Some(id) => id.clone(),
            None => {
                let id = self.slot.get_or_create();
                self.session_id = Some(id.clone());
                id
            }
        }
    }

    /// Returns whether a timer was still pending.
    fn cancel_timer(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let pending = !handle.is_finished();
                handle.abort();
                pending
            }
            None => false,
        }
    }
}

impl<A, S> Drop for DraftSessionManager<A, S> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

/// Serializes a save against the commit delete.
struct SaveGuard {
    lock: Arc<Mutex<u64>>,
    generation: u64,
}

/// Upserts `snapshot` if the required field is filled in and reports the
/// outcome on `status`, clearing it again after `status_clear`.
#[allow(clippy::too_many_arguments)]
async fn autosave<A: DraftApi>(
    api: &A,
    flow: DraftFlow,
    session_id: &SessionId,
    snapshot: &DraftSnapshot,
    config: &DraftConfig,
    seq: &AtomicU64,
    status: &watch::Sender<SaveStatus>,
    save: &SaveGuard,
) -> ClientResult<bool> {
    if !snapshot.form.is_filled(&config.required_field) {
        tracing::trace!(flow = %flow, field = %config.required_field, "autosave skipped");
        return Ok(false);
    }

    let generation = save.lock.lock().await;
    if *generation != save.generation {
        tracing::debug!(flow = %flow, session_id = %session_id, "autosave dropped after commit");
        return Ok(false);
    }

    let attempt = seq.fetch_add(1, Ordering::Relaxed) + 1;
    status::publish(status, SaveState::Saving, attempt);

    let result = api.save_draft(flow, session_id, snapshot).await;
    match &result {
        Ok(()) => {
            tracing::debug!(flow = %flow, session_id = %session_id, "draft saved");
            status::publish(status, SaveState::Saved, attempt);
        }
        Err(err) => {
            tracing::warn!(flow = %flow, session_id = %session_id, error = %err, "draft save failed");
            status::publish(status, SaveState::Error, attempt);
        }
    }

    let status = status.clone();
    let clear_after = config.status_clear;
    tokio::spawn(async move {
        tokio::time::sleep(clear_after).await;
        status::clear(&status, attempt);
    });

    result.map(|()| true)
}
