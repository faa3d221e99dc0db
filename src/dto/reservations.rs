use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::drafts::{FormSnapshot, SessionId};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewReservation {
    pub session_id: Option<SessionId>,
    pub details: FormSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReservationConfirmation {
    pub id: Uuid,
    pub reference: String,
    pub created_at: DateTime<Utc>,
}
