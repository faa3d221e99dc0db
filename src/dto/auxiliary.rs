use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::drafts::FormSnapshot;

/// Data collected out-of-band during a flow, such as a signed waiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuxiliaryForm {
    pub kind: String,
    pub fields: FormSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuxiliaryReceipt {
    pub id: Uuid,
}
