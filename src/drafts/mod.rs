//! Resumable, auto-saved forms keyed by a tab-scoped session id.

pub mod config;
pub mod manager;
pub mod session;
pub mod snapshot;
pub mod status;

pub use config::DraftConfig;
pub use manager::{DraftPhase, DraftSessionManager, LoadOutcome};
pub use session::SessionSlot;
pub use snapshot::{DraftFlow, DraftSnapshot, FormSnapshot, SessionId};
pub use status::{SaveState, SaveStatus};
