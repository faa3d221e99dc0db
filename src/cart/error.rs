use thiserror::Error;

/// Rejected cart mutations. The cart is never modified when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("invalid product: {0}")]
    InvalidProduct(&'static str),

    #[error("product is not available")]
    InactiveProduct,

    #[error("quantity must be greater than 0")]
    InvalidQuantity,

    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    #[error("quantity {requested} exceeds stock limit {limit}")]
    StockExceeded { requested: u32, limit: u32 },

    #[error("cart totals are out of range")]
    OutOfRange,
}
