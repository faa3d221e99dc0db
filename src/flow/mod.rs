//! Edit / review / confirm flows that turn a draft into a reservation or an
//! order.

mod booking;
mod checkout;
mod error;
mod form;

pub use booking::{BOOKING_REQUIRED_FIELDS, BookingFlow};
pub use checkout::{CHECKOUT_REQUIRED_FIELDS, CheckoutFlow};
pub use error::{FieldError, FlowError};
pub use form::ReviewForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStage {
    Editing,
    Reviewing,
    Committed,
    Cancelled,
}
