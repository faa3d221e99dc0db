use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};

use crate::{
    drafts::{DraftFlow, SessionId},
    dto::auxiliary::{AuxiliaryForm, AuxiliaryReceipt},
    error::AppResult,
    response::ApiResponse,
    services::auxiliary_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/{flow}/{session_id}", post(submit_auxiliary_form))
}

#[utoipa::path(
    post,
    path = "/api/auxiliary/{flow}/{session_id}",
    params(
        ("flow" = DraftFlow, Path, description = "booking or checkout"),
        ("session_id" = String, Path, description = "Session the form belongs to")
    ),
    request_body = AuxiliaryForm,
    responses(
        (status = 201, description = "Form stored", body = ApiResponse<AuxiliaryReceipt>),
        (status = 400, description = "Empty or untyped form"),
    ),
    tag = "Auxiliary"
)]
pub async fn submit_auxiliary_form(
    State(state): State<AppState>,
    Path((flow, session_id)): Path<(DraftFlow, SessionId)>,
    Json(form): Json<AuxiliaryForm>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuxiliaryReceipt>>)> {
    let response = auxiliary_service::submit_auxiliary_form(&state, flow, session_id, form).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
