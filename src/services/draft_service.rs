use std::time::Duration;

use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    sea_query::OnConflict,
};
use uuid::Uuid;

use crate::{
    audit::audit_best_effort,
    drafts::{DraftFlow, DraftSnapshot, SessionId},
    dto::drafts::DraftRecord,
    entity::drafts::{ActiveModel as DraftActive, Column as DraftCol, Entity as Drafts, Model as DraftModel},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
};

const MAX_SESSION_ID_LEN: usize = 128;

fn validate_session_id(session_id: &SessionId) -> AppResult<()> {
    let id = session_id.as_str();
    if id.trim().is_empty() || id.len() > MAX_SESSION_ID_LEN {
        return Err(AppError::BadRequest("Invalid session id".into()));
    }
    Ok(())
}

fn scoped(flow: DraftFlow, session_id: &SessionId) -> Condition {
    Condition::all()
        .add(DraftCol::Flow.eq(flow.as_str()))
        .add(DraftCol::SessionId.eq(session_id.as_str()))
}

pub async fn get_draft(
    state: &AppState,
    flow: DraftFlow,
    session_id: SessionId,
) -> AppResult<ApiResponse<DraftRecord>> {
    validate_session_id(&session_id)?;

    let model = Drafts::find()
        .filter(scoped(flow, &session_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "OK",
        draft_from_entity(model)?,
        Some(Meta::empty()),
    ))
}

/// Upsert keyed by (flow, session_id): repeated saves overwrite the payload.
pub async fn save_draft(
    state: &AppState,
    flow: DraftFlow,
    session_id: SessionId,
    snapshot: DraftSnapshot,
) -> AppResult<ApiResponse<DraftRecord>> {
    validate_session_id(&session_id)?;

    let payload = serde_json::to_value(&snapshot).map_err(|e| AppError::Internal(e.into()))?;
    let now = Utc::now();

    let model = Drafts::insert(DraftActive {
        id: Set(Uuid::new_v4()),
        flow: Set(flow.as_str().to_string()),
        session_id: Set(session_id.to_string()),
        payload: Set(payload),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    })
    .on_conflict(
        OnConflict::columns([DraftCol::Flow, DraftCol::SessionId])
            .update_columns([DraftCol::Payload, DraftCol::UpdatedAt])
            .to_owned(),
    )
    .exec_with_returning(&state.orm)
    .await?;

    tracing::debug!(flow = %flow, session_id = %session_id, "draft upserted");
    audit_best_effort(
        &state.pool,
        Some(session_id.as_str()),
        "draft_saved",
        "drafts",
        serde_json::json!({ "flow": flow.as_str(), "has_cart": snapshot.cart.is_some() }),
    )
    .await;

    Ok(ApiResponse::success(
        "Draft saved",
        draft_from_entity(model)?,
        Some(Meta::empty()),
    ))
}

/// Deleting a missing draft succeeds; callers treat deletion as best-effort.
pub async fn delete_draft(
    state: &AppState,
    flow: DraftFlow,
    session_id: SessionId,
) -> AppResult<ApiResponse<serde_json::Value>> {
    validate_session_id(&session_id)?;

    let result = Drafts::delete_many()
        .filter(scoped(flow, &session_id))
        .exec(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Draft deleted",
        serde_json::json!({ "deleted": result.rows_affected > 0 }),
        Some(Meta::empty()),
    ))
}

/// Removes drafts that have not been saved for `older_than`.
pub async fn purge_stale_drafts(orm: &DatabaseConnection, older_than: Duration) -> AppResult<u64> {
    let retention = chrono::Duration::from_std(older_than).map_err(|e| AppError::Internal(e.into()))?;
    let cutoff = Utc::now() - retention;

    let result = Drafts::delete_many()
        .filter(DraftCol::UpdatedAt.lt(cutoff))
        .exec(orm)
        .await?;

    Ok(result.rows_affected)
}

fn draft_from_entity(model: DraftModel) -> AppResult<DraftRecord> {
    let flow = serde_json::from_value::<DraftFlow>(serde_json::Value::String(model.flow))
        .map_err(|e| AppError::Internal(e.into()))?;
    let snapshot = serde_json::from_value::<DraftSnapshot>(model.payload)
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(DraftRecord {
        flow,
        session_id: SessionId::from(model.session_id),
        snapshot,
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}
