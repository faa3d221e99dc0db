use crate::storage::KeyValueStore;

use super::snapshot::{DraftFlow, SessionId};

/// The storage slot holding one flow's session id.
#[derive(Debug)]
pub struct SessionSlot<S> {
    flow: DraftFlow,
    storage: S,
}

impl<S: KeyValueStore> SessionSlot<S> {
    pub fn new(flow: DraftFlow, storage: S) -> Self {
        Self { flow, storage }
    }

    /// Returns the stored id, creating and storing one if none exists.
    pub fn get_or_create(&self) -> SessionId {
        let key = self.flow.session_key();
        match self.storage.get(&key) {
            Ok(Some(id)) if !id.trim().is_empty() => return SessionId::from(id),
            Ok(_) => {}
            Err(err) => tracing::warn!(error = %err, flow = %self.flow, "could not read session id"),
        }

        let id = SessionId::generate();
        if let Err(err) = self.storage.set(&key, id.as_str()) {
            tracing::warn!(error = %err, flow = %self.flow, "could not store session id");
        }
        tracing::debug!(flow = %self.flow, session_id = %id, "new draft session");
        id
    }

    pub fn discard(&self) {
        if let Err(err) = self.storage.remove(&self.flow.session_key()) {
            tracing::warn!(error = %err, flow = %self.flow, "could not discard session id");
        }
    }
}
