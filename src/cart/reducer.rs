use chrono::{DateTime, Utc};

use super::model::{CartItem, CartState, ProductId};

/// Every transition the cart knows about.
///
/// The reducer applies these without validation; stock and quantity bounds
/// are checked by [`CartStore`](super::CartStore) before dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    AddItem { item: CartItem, quantity: u32 },
    RemoveItem { id: ProductId },
    UpdateQuantity { id: ProductId, quantity: u32 },
    Clear,
    Hydrate {
        items: Vec<CartItem>,
        last_updated: Option<DateTime<Utc>>,
    },
}

/// Pure transition function. Totals are folded from the full item list on
/// every call, and an action that changes nothing returns the input state
/// untouched (including `last_updated`). An action whose totals would
/// overflow also leaves the state untouched; see [`try_reduce`].
pub fn reduce(state: &CartState, action: CartAction, at: DateTime<Utc>) -> CartState {
    try_reduce(state, action, at).unwrap_or_else(|| state.clone())
}

/// Like [`reduce`] but returns `None` when a quantity, subtotal or total
/// does not fit.
pub fn try_reduce(state: &CartState, action: CartAction, at: DateTime<Utc>) -> Option<CartState> {
    match action {
        CartAction::AddItem { item, quantity } => {
            let mut items = state.items.clone();
            match items.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => {
                    let quantity = existing.quantity.checked_add(quantity)?;
                    *existing = CartItem {
                        stock_limit: item.stock_limit,
                        ..existing.with_quantity(quantity)?
                    };
                }
                None => items.push(item.with_quantity(quantity)?),
            }
            CartState::from_items(items, Some(at))
        }
        CartAction::RemoveItem { id } => {
            if state.item(id).is_none() {
                return Some(state.clone());
            }
            let items = state
                .items
                .iter()
                .filter(|item| item.id != id)
                .cloned()
                .collect();
            CartState::from_items(items, Some(at))
        }
        CartAction::UpdateQuantity { id, quantity: 0 } => {
            try_reduce(state, CartAction::RemoveItem { id }, at)
        }
        CartAction::UpdateQuantity { id, quantity } => {
            if state.item(id).is_none() {
                return Some(state.clone());
            }
            let items = state
                .items
                .iter()
                .map(|item| {
                    if item.id == id {
                        item.with_quantity(quantity)
                    } else {
                        Some(item.clone())
                    }
                })
                .collect::<Option<Vec<CartItem>>>()?;
            CartState::from_items(items, Some(at))
        }
        CartAction::Clear => Some(CartState {
            last_updated: Some(at),
            ..CartState::default()
        }),
        CartAction::Hydrate {
            items,
            last_updated,
        } => {
            let items = items.into_iter().filter(|item| item.quantity > 0).collect();
            CartState::from_items(items, last_updated.or(Some(at)))
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;

    fn item(price: Decimal, quantity: u32) -> CartItem {
        CartItem {
            id: Uuid::new_v4(),
            name: "Kayak rental".into(),
            price,
            image_ref: None,
            sku: None,
            quantity,
            stock_limit: 10,
            subtotal: Decimal::ZERO,
        }
    }

    #[test]
    fn add_appends_in_insertion_order() {
        let now = Utc::now();
        let a = item(Decimal::new(1000, 2), 1);
        let b = item(Decimal::new(250, 2), 1);

        let state = reduce(&CartState::default(), CartAction::AddItem { item: a.clone(), quantity: 2 }, now);
        let state = reduce(&state, CartAction::AddItem { item: b.clone(), quantity: 1 }, now);

        let ids: Vec<_> = state.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
        assert_eq!(state.total_items, 3);
        assert_eq!(state.total_amount, Decimal::new(2250, 2));
    }

    #[test]
    fn add_existing_increments_and_recomputes_subtotal() {
        let now = Utc::now();
        let a = item(Decimal::new(1000, 2), 1);

        let state = reduce(&CartState::default(), CartAction::AddItem { item: a.clone(), quantity: 1 }, now);
        let state = reduce(&state, CartAction::AddItem { item: a.clone(), quantity: 2 }, now);

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].quantity, 3);
        assert_eq!(state.items[0].subtotal, Decimal::new(3000, 2));
    }

    #[test]
    fn removing_absent_item_keeps_state_identical() {
        let state = reduce(
            &CartState::default(),
            CartAction::AddItem { item: item(Decimal::ONE, 1), quantity: 1 },
            Utc::now(),
        );

        let next = reduce(&state, CartAction::RemoveItem { id: Uuid::new_v4() }, Utc::now());

        assert_eq!(next, state);
    }

    #[test]
    fn totals_round_once_after_summation() {
        let now = Utc::now();
        let a = item(Decimal::new(3335, 3), 1);
        let b = item(Decimal::new(3335, 3), 1);

        let state = reduce(&CartState::default(), CartAction::AddItem { item: a, quantity: 1 }, now);
        let state = reduce(&state, CartAction::AddItem { item: b, quantity: 1 }, now);

        // 3.335 + 3.335 = 6.670; rounding each line first would give 6.68.
        assert_eq!(state.total_amount, Decimal::new(667, 2));
    }

    #[test]
    fn hydrate_drops_zero_quantities_and_recomputes() {
        let mut stale = item(Decimal::new(500, 2), 2);
        stale.subtotal = Decimal::new(99999, 2);
        let empty = item(Decimal::new(500, 2), 0);

        let state = reduce(
            &CartState::default(),
            CartAction::Hydrate {
                items: vec![stale, empty],
                last_updated: None,
            },
            Utc::now(),
        );

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].subtotal, Decimal::new(1000, 2));
        assert_eq!(state.total_amount, Decimal::new(1000, 2));
    }

    #[test]
    fn overflowing_totals_are_refused() {
        let huge = item(Decimal::MAX, 1);

        let hydrated = try_reduce(
            &CartState::default(),
            CartAction::Hydrate {
                items: vec![item(Decimal::ONE, 4_000_000_000), item(Decimal::ONE, 4_000_000_000)],
                last_updated: None,
            },
            Utc::now(),
        );
        assert!(hydrated.is_none());

        let state = reduce(&CartState::default(), CartAction::AddItem { item: huge.clone(), quantity: 1 }, Utc::now());
        let next = reduce(&state, CartAction::AddItem { item: huge, quantity: 2 }, Utc::now());
        assert_eq!(next, state);
    }
}
