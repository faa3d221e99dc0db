use chrono::Utc;
use uuid::Uuid;

use crate::{drafts::FormSnapshot, error::AppError};

pub mod auxiliary_service;
pub mod draft_service;
pub mod order_service;
pub mod product_service;
pub mod reservation_service;

/// Human-readable reference such as `INV-20260101-1a2b3c4d`.
pub(crate) fn build_reference(prefix: &str, id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let short: String = id.simple().to_string().chars().take(8).collect();
    format!("{prefix}-{date}-{short}")
}

pub(crate) fn require_fields(form: &FormSnapshot, fields: &[&str]) -> Result<(), AppError> {
    let missing: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|field| !form.is_filled(field))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}
