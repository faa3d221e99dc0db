use thiserror::Error;

use crate::client::ClientError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("{} field(s) need attention", .0.len())]
    Invalid(Vec<FieldError>),

    #[error("cart is empty")]
    EmptyCart,

    #[error("review the form before confirming")]
    NotReviewing,

    /// The final submission failed. Draft and cart are kept for a retry.
    #[error("submission failed: {0}")]
    Submission(#[source] ClientError),
}
