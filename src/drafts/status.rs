use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    Idle,
    Saving,
    Saved,
    Error,
}

/// Transient autosave indicator. `seq` identifies the save attempt that
/// produced it so a late result never overwrites a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveStatus {
    pub state: SaveState,
    pub seq: u64,
}

impl Default for SaveStatus {
    fn default() -> Self {
        Self {
            state: SaveState::Idle,
            seq: 0,
        }
    }
}

pub(crate) fn publish(status: &watch::Sender<SaveStatus>, state: SaveState, seq: u64) {
    status.send_if_modified(|current| {
        if current.seq > seq {
            return false;
        }
        *current = SaveStatus { state, seq };
        true
    });
}

/// Resets to idle unless a newer attempt has reported since.
pub(crate) fn clear(status: &watch::Sender<SaveStatus>, seq: u64) {
    status.send_if_modified(|current| {
        if current.seq != seq || current.state == SaveState::Saving {
            return false;
        }
        current.state = SaveState::Idle;
        true
    });
}
