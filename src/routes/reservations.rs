use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::{
    dto::reservations::{NewReservation, ReservationConfirmation},
    error::AppResult,
    response::ApiResponse,
    services::reservation_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_reservation))
}

#[utoipa::path(
    post,
    path = "/api/reservations",
    request_body = NewReservation,
    responses(
        (status = 201, description = "Reservation created", body = ApiResponse<ReservationConfirmation>),
        (status = 400, description = "Missing required booking fields"),
    ),
    tag = "Reservations"
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(payload): Json<NewReservation>,
) -> AppResult<(StatusCode, Json<ApiResponse<ReservationConfirmation>>)> {
    let response = reservation_service::create_reservation(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
