use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use uuid::Uuid;

use crate::{
    audit::audit_best_effort,
    drafts::{DraftFlow, SessionId},
    dto::auxiliary::{AuxiliaryForm, AuxiliaryReceipt},
    entity::auxiliary_forms::ActiveModel as AuxiliaryActive,
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn submit_auxiliary_form(
    state: &AppState,
    flow: DraftFlow,
    session_id: SessionId,
    form: AuxiliaryForm,
) -> AppResult<ApiResponse<AuxiliaryReceipt>> {
    let kind = form.kind.trim();
    if kind.is_empty() {
        return Err(AppError::BadRequest("Form kind is required".into()));
    }
    if form.fields.is_empty() {
        return Err(AppError::BadRequest("Form has no fields".into()));
    }

    let fields = serde_json::to_value(&form.fields).map_err(|e| AppError::Internal(e.into()))?;
    let model = AuxiliaryActive {
        id: Set(Uuid::new_v4()),
        flow: Set(flow.as_str().to_string()),
        session_id: Set(session_id.to_string()),
        kind: Set(kind.to_string()),
        fields: Set(fields),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    audit_best_effort(
        &state.pool,
        Some(session_id.as_str()),
        "auxiliary_submitted",
        "auxiliary_forms",
        serde_json::json!({ "flow": flow.as_str(), "kind": model.kind }),
    )
    .await;

    Ok(ApiResponse::success(
        "Form received",
        AuxiliaryReceipt { id: model.id },
        Some(Meta::empty()),
    ))
}
