use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::drafts::{DraftFlow, DraftSnapshot, SessionId};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DraftRecord {
    pub flow: DraftFlow,
    pub session_id: SessionId,
    pub snapshot: DraftSnapshot,
    pub updated_at: DateTime<Utc>,
}
