use chrono::Utc;
use rust_decimal::Decimal;

use crate::storage::KeyValueStore;

use super::{
    error::CartError,
    model::{CartItem, CartState, CatalogProduct, ProductId},
    reducer::{CartAction, try_reduce},
};

pub const CART_STORAGE_KEY: &str = "storefront:cart";

/// Owns the authoritative cart for one session.
///
/// Validation happens here, before an action reaches the reducer, so a
/// rejected call never touches state or storage. Persistence failures are
/// logged and do not affect the in-memory cart.
#[derive(Debug)]
pub struct CartStore<S> {
    state: CartState,
    storage: S,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Reads the persisted snapshot once. An unreadable snapshot is discarded.
    pub fn hydrate(storage: S) -> Self {
        let mut store = Self {
            state: CartState::default(),
            storage,
        };

        let raw = match store.storage.get(CART_STORAGE_KEY) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "could not read cart snapshot");
                None
            }
        };

        if let Some(raw) = raw {
            let restored = serde_json::from_str::<CartState>(&raw)
                .map_err(|err| err.to_string())
                .and_then(|snapshot| {
                    try_reduce(
                        &store.state,
                        CartAction::Hydrate {
                            items: snapshot.items,
                            last_updated: snapshot.last_updated,
                        },
                        Utc::now(),
                    )
                    .ok_or_else(|| CartError::OutOfRange.to_string())
                });
            match restored {
                Ok(state) => {
                    store.state = state;
                    tracing::debug!(items = store.state.items.len(), "cart hydrated");
                }
                Err(err) => {
                    tracing::warn!(error = %err, "discarding unreadable cart snapshot");
                    if let Err(err) = store.storage.remove(CART_STORAGE_KEY) {
                        tracing::warn!(error = %err, "could not clear cart snapshot");
                    }
                }
            }
        }

        store
    }

    pub fn add_item(&mut self, product: &CatalogProduct, quantity: u32) -> Result<&CartState, CartError> {
        let price = match product.price {
            Some(price) if price >= Decimal::ZERO => price,
            Some(_) => return Err(CartError::InvalidProduct("price must not be negative")),
            None => return Err(CartError::InvalidProduct("price is missing")),
        };
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        if !product.is_active {
            return Err(CartError::InactiveProduct);
        }
        if product.stock_quantity < quantity {
            return Err(CartError::InsufficientStock {
                requested: quantity,
                available: product.stock_quantity,
            });
        }
        let requested = self.item_quantity(product.id).saturating_add(quantity);
        if requested > product.stock_quantity {
            return Err(CartError::InsufficientStock {
                requested,
                available: product.stock_quantity,
            });
        }

        let item = CartItem::from_product(product, price, quantity).ok_or(CartError::OutOfRange)?;
        self.dispatch(CartAction::AddItem { item, quantity })?;
        Ok(&self.state)
    }

    pub fn remove_item(&mut self, id: ProductId) -> &CartState {
        self.dispatch_infallible(CartAction::RemoveItem { id });
        &self.state
    }

    /// A quantity of zero or less removes the item.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> Result<&CartState, CartError> {
        if quantity <= 0 {
            return Ok(self.remove_item(id));
        }
        let Some(item) = self.state.item(id) else {
            return Ok(&self.state);
        };
        let limit = item.stock_limit;
        let quantity = match u32::try_from(quantity) {
            Ok(quantity) if quantity <= limit => quantity,
            _ => {
                return Err(CartError::StockExceeded {
                    requested: u32::try_from(quantity).unwrap_or(u32::MAX),
                    limit,
                });
            }
        };

        self.dispatch(CartAction::UpdateQuantity { id, quantity })?;
        Ok(&self.state)
    }

    pub fn clear(&mut self) -> &CartState {
        self.dispatch_infallible(CartAction::Clear);
        &self.state
    }

    pub fn item_quantity(&self, id: ProductId) -> u32 {
        self.state.item_quantity(id)
    }

    pub fn is_in_cart(&self, id: ProductId) -> bool {
        self.state.item(id).is_some()
    }

    pub fn items_count(&self) -> u32 {
        self.state.total_items
    }

    pub fn total(&self) -> Decimal {
        self.state.total_amount
    }

    pub fn items(&self) -> &[CartItem] {
        &self.state.items
    }

    pub fn has_items(&self) -> bool {
        !self.state.is_empty()
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    fn dispatch(&mut self, action: CartAction) -> Result<(), CartError> {
        let next = try_reduce(&self.state, action, Utc::now()).ok_or(CartError::OutOfRange)?;
        if next != self.state {
            self.state = next;
            self.persist();
        }
        Ok(())
    }

    /// For actions that only shrink the cart, so totals cannot overflow.
    fn dispatch_infallible(&mut self, action: CartAction) {
        if let Err(err) = self.dispatch(action) {
            tracing::warn!(error = %err, "cart action rejected");
        }
    }

    fn persist(&self) {
        let raw = match serde_json::to_string(&self.state) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "could not serialize cart snapshot");
                return;
            }
        };
        if let Err(err) = self.storage.set(CART_STORAGE_KEY, &raw) {
            tracing::warn!(error = %err, "cart snapshot write failed");
        }
    }
}
