use std::future::Future;

use crate::{
    drafts::{DraftFlow, DraftSnapshot, SessionId},
    dto::{
        auxiliary::AuxiliaryForm,
        orders::{NewOrder, OrderConfirmation},
        reservations::{NewReservation, ReservationConfirmation},
    },
};

use super::error::ClientResult;

/// Remote draft store keyed by flow and session id.
pub trait DraftApi: Send + Sync {
    /// `Ok(None)` when no draft exists for the session.
    fn get_draft(
        &self,
        flow: DraftFlow,
        session_id: &SessionId,
    ) -> impl Future<Output = ClientResult<Option<DraftSnapshot>>> + Send;

    /// Upsert: saving twice under the same id overwrites.
    fn save_draft(
        &self,
        flow: DraftFlow,
        session_id: &SessionId,
        snapshot: &DraftSnapshot,
    ) -> impl Future<Output = ClientResult<()>> + Send;

    fn delete_draft(
        &self,
        flow: DraftFlow,
        session_id: &SessionId,
    ) -> impl Future<Output = ClientResult<()>> + Send;
}

/// Final submissions at the end of a booking or checkout.
pub trait SubmissionApi: Send + Sync {
    fn create_reservation(
        &self,
        reservation: &NewReservation,
    ) -> impl Future<Output = ClientResult<ReservationConfirmation>> + Send;

    fn create_order(
        &self,
        order: &NewOrder,
    ) -> impl Future<Output = ClientResult<OrderConfirmation>> + Send;

    fn submit_auxiliary_form(
        &self,
        flow: DraftFlow,
        session_id: &SessionId,
        form: &AuxiliaryForm,
    ) -> impl Future<Output = ClientResult<()>> + Send;
}
