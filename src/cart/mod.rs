//! In-memory shopping cart with derived totals and a persisted snapshot.

pub mod error;
pub mod model;
pub mod reducer;
pub mod store;

pub use error::CartError;
pub use model::{CartItem, CartState, CatalogProduct, ProductId};
pub use reducer::{CartAction, reduce, try_reduce};
pub use store::{CART_STORAGE_KEY, CartStore};
