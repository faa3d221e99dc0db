use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use uuid::Uuid;

use crate::{
    audit::audit_best_effort,
    dto::reservations::{NewReservation, ReservationConfirmation},
    entity::reservations::ActiveModel as ReservationActive,
    error::{AppError, AppResult},
    flow::BOOKING_REQUIRED_FIELDS,
    response::{ApiResponse, Meta},
    state::AppState,
};

use super::{build_reference, require_fields};

pub async fn create_reservation(
    state: &AppState,
    payload: NewReservation,
) -> AppResult<ApiResponse<ReservationConfirmation>> {
    require_fields(&payload.details, BOOKING_REQUIRED_FIELDS)?;

    let id = Uuid::new_v4();
    let details = serde_json::to_value(&payload.details).map_err(|e| AppError::Internal(e.into()))?;
    let session_id = payload.session_id.map(|id| id.to_string());

    let reservation = ReservationActive {
        id: Set(id),
        session_id: Set(session_id.clone()),
        reference: Set(build_reference("RSV", id)),
        details: Set(details),
        status: Set("pending".into()),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(reservation_id = %reservation.id, reference = %reservation.reference, "reservation created");
    audit_best_effort(
        &state.pool,
        session_id.as_deref(),
        "reservation_created",
        "reservations",
        serde_json::json!({ "reservation_id": reservation.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Reservation created",
        ReservationConfirmation {
            id: reservation.id,
            reference: reservation.reference,
            created_at: reservation.created_at.with_timezone(&Utc),
        },
        Some(Meta::empty()),
    ))
}
