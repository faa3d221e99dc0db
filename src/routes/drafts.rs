use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    drafts::{DraftFlow, DraftSnapshot, SessionId},
    dto::drafts::DraftRecord,
    error::AppResult,
    response::ApiResponse,
    services::draft_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{flow}/{session_id}",
        get(get_draft).put(save_draft).delete(delete_draft),
    )
}

#[utoipa::path(
    get,
    path = "/api/drafts/{flow}/{session_id}",
    params(
        ("flow" = DraftFlow, Path, description = "booking or checkout"),
        ("session_id" = String, Path, description = "Client-generated session id")
    ),
    responses(
        (status = 200, description = "Saved draft", body = ApiResponse<DraftRecord>),
        (status = 404, description = "No draft for this session"),
    ),
    tag = "Drafts"
)]
pub async fn get_draft(
    State(state): State<AppState>,
    Path((flow, session_id)): Path<(DraftFlow, SessionId)>,
) -> AppResult<Json<ApiResponse<DraftRecord>>> {
    let response = draft_service::get_draft(&state, flow, session_id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/api/drafts/{flow}/{session_id}",
    params(
        ("flow" = DraftFlow, Path, description = "booking or checkout"),
        ("session_id" = String, Path, description = "Client-generated session id")
    ),
    request_body = DraftSnapshot,
    responses(
        (status = 200, description = "Draft created or overwritten", body = ApiResponse<DraftRecord>),
        (status = 400, description = "Invalid session id"),
    ),
    tag = "Drafts"
)]
pub async fn save_draft(
    State(state): State<AppState>,
    Path((flow, session_id)): Path<(DraftFlow, SessionId)>,
    Json(snapshot): Json<DraftSnapshot>,
) -> AppResult<Json<ApiResponse<DraftRecord>>> {
    let response = draft_service::save_draft(&state, flow, session_id, snapshot).await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/api/drafts/{flow}/{session_id}",
    params(
        ("flow" = DraftFlow, Path, description = "booking or checkout"),
        ("session_id" = String, Path, description = "Client-generated session id")
    ),
    responses(
        (status = 200, description = "Draft removed (or was already absent)", body = ApiResponse<serde_json::Value>),
    ),
    tag = "Drafts"
)]
pub async fn delete_draft(
    State(state): State<AppState>,
    Path((flow, session_id)): Path<(DraftFlow, SessionId)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let response = draft_service::delete_draft(&state, flow, session_id).await?;
    Ok(Json(response))
}
