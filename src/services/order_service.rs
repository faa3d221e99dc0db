use std::collections::HashSet;

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QuerySelect,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::audit_best_effort,
    dto::orders::{NewOrder, OrderConfirmation, OrderWithItems},
    entity::{
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems, Model as OrderItemModel},
        orders::{Entity as Orders, ActiveModel as OrderActive, Model as OrderModel},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    flow::CHECKOUT_REQUIRED_FIELDS,
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    state::AppState,
};

use super::{build_reference, require_fields};

/// Places an order from the submitted cart lines. Prices come from the
/// catalog; the order is refused when they no longer match what the
/// customer reviewed.
pub async fn create_order(
    state: &AppState,
    payload: NewOrder,
) -> AppResult<ApiResponse<OrderConfirmation>> {
    require_fields(&payload.customer, CHECKOUT_REQUIRED_FIELDS)?;

    if payload.items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }
    let mut seen = HashSet::new();
    for line in &payload.items {
        if line.quantity == 0 {
            return Err(AppError::BadRequest("Cart has invalid quantity".into()));
        }
        if !seen.insert(line.product_id) {
            return Err(AppError::BadRequest(format!(
                "Product {} appears more than once",
                line.product_id
            )));
        }
    }

    let txn = state.orm.begin().await?;

    let product_ids: Vec<Uuid> = payload.items.iter().map(|line| line.product_id).collect();
    let products = Products::find()
        .filter(ProdCol::Id.is_in(product_ids))
        .lock(LockType::Update)
        .all(&txn)
        .await?;

    let mut total = Decimal::ZERO;
    let mut priced = Vec::with_capacity(payload.items.len());
    for line in &payload.items {
        let product = products
            .iter()
            .find(|p| p.id == line.product_id)
            .ok_or_else(|| AppError::BadRequest(format!("Product {} not found", line.product_id)))?;
        if !product.is_active {
            return Err(AppError::BadRequest(format!(
                "Product {} is no longer available",
                product.name
            )));
        }
        let quantity = i32::try_from(line.quantity)
            .map_err(|_| AppError::BadRequest("Cart has invalid quantity".into()))?;
        if product.stock < quantity {
            return Err(AppError::BadRequest(format!(
                "Insufficient stock for product {}",
                product.name
            )));
        }
        total += product.price * Decimal::from(line.quantity);
        priced.push((product.id, quantity, product.price));
    }
    let total = total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let expected = payload
        .expected_total
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if total != expected {
        return Err(AppError::Unprocessable(format!(
            "Order total changed from {expected} to {total}, please review your cart"
        )));
    }

    let customer =
        serde_json::to_value(&payload.customer).map_err(|e| AppError::Internal(e.into()))?;
    let session_id = payload.session_id.map(|id| id.to_string());
    let order_id = Uuid::new_v4();

    let order = OrderActive {
        id: Set(order_id),
        session_id: Set(session_id.clone()),
        customer: Set(customer),
        total_amount: Set(total),
        status: Set("pending".into()),
        invoice_number: Set(build_reference("INV", order_id)),
        created_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    for (product_id, quantity, price) in priced {
        OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            price: Set(price),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        Products::update_many()
            .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).sub(quantity))
            .filter(ProdCol::Id.eq(product_id))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;

    tracing::info!(order_id = %order.id, total = %order.total_amount, "order created");
    audit_best_effort(
        &state.pool,
        session_id.as_deref(),
        "order_created",
        "orders",
        serde_json::json!({ "order_id": order.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order created",
        OrderConfirmation {
            id: order.id,
            invoice_number: order.invoice_number,
            total_amount: order.total_amount,
            created_at: order.created_at.with_timezone(&Utc),
        },
        Some(Meta::empty()),
    ))
}

pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        session_id: model.session_id,
        customer: model.customer,
        total_amount: model.total_amount,
        status: model.status,
        invoice_number: model.invoice_number,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
        price: model.price,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
