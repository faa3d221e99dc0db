use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Product;

pub type ProductId = Uuid;

/// A product as the catalog describes it at the moment it is added.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Option<Decimal>,
    pub image_ref: Option<String>,
    pub sku: Option<String>,
    pub stock_quantity: u32,
    pub is_active: bool,
}

impl From<Product> for CatalogProduct {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: Some(product.price),
            image_ref: product.image_ref,
            sku: product.sku,
            stock_quantity: u32::try_from(product.stock).unwrap_or(0),
            is_active: product.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[schema(value_type = uuid::Uuid)]
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image_ref: Option<String>,
    pub sku: Option<String>,
    pub quantity: u32,
    pub stock_limit: u32,
    pub subtotal: Decimal,
}

impl CartItem {
    /// `None` when the subtotal does not fit in a `Decimal`.
    pub(crate) fn from_product(product: &CatalogProduct, price: Decimal, quantity: u32) -> Option<Self> {
        Some(Self {
            id: product.id,
            name: product.name.clone(),
            price,
            image_ref: product.image_ref.clone(),
            sku: product.sku.clone(),
            quantity,
            stock_limit: product.stock_quantity,
            subtotal: price.checked_mul(Decimal::from(quantity))?,
        })
    }

    pub(crate) fn with_quantity(&self, quantity: u32) -> Option<Self> {
        Some(Self {
            quantity,
            subtotal: self.price.checked_mul(Decimal::from(quantity))?,
            ..self.clone()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub total_amount: Decimal,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for CartState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_items: 0,
            total_amount: Decimal::ZERO,
            last_updated: None,
        }
    }
}

impl CartState {
    /// Builds a state whose totals are folded from `items`. Returns `None`
    /// when a subtotal or either total overflows.
    pub fn from_items(items: Vec<CartItem>, last_updated: Option<DateTime<Utc>>) -> Option<Self> {
        let items = items
            .into_iter()
            .map(|item| item.with_quantity(item.quantity))
            .collect::<Option<Vec<CartItem>>>()?;
        let total_items = items
            .iter()
            .try_fold(0u32, |acc, item| acc.checked_add(item.quantity))?;
        let total_amount = items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.subtotal))?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        Some(Self {
            items,
            total_items,
            total_amount,
            last_updated,
        })
    }

    pub fn item(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_quantity(&self, id: ProductId) -> u32 {
        self.item(id).map_or(0, |item| item.quantity)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
