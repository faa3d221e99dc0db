use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    cart::CartItem,
    drafts::{DraftFlow, DraftSnapshot, FormSnapshot, SessionId},
    dto::{
        auxiliary::{AuxiliaryForm, AuxiliaryReceipt},
        drafts::DraftRecord,
        orders::{NewOrder, OrderConfirmation, OrderLine, OrderWithItems},
        products::ProductList,
        reservations::{NewReservation, ReservationConfirmation},
    },
    models::{Order, OrderItem, Product, Reservation},
    response::{ApiResponse, Meta},
    routes::{auxiliary, drafts, health, orders, params, products, reservations},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness,
        products::list_products,
        products::get_product,
        drafts::get_draft,
        drafts::save_draft,
        drafts::delete_draft,
        reservations::create_reservation,
        orders::create_order,
        orders::get_order,
        auxiliary::submit_auxiliary_form
    ),
    components(
        schemas(
            Product,
            Reservation,
            Order,
            OrderItem,
            CartItem,
            DraftFlow,
            SessionId,
            FormSnapshot,
            DraftSnapshot,
            DraftRecord,
            NewReservation,
            ReservationConfirmation,
            OrderLine,
            NewOrder,
            OrderConfirmation,
            OrderWithItems,
            AuxiliaryForm,
            AuxiliaryReceipt,
            ProductList,
            params::Pagination,
            params::ProductQuery,
            health::HealthData,
            Meta,
            ApiResponse<health::HealthData>,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<DraftRecord>,
            ApiResponse<ReservationConfirmation>,
            ApiResponse<OrderConfirmation>,
            ApiResponse<OrderWithItems>,
            ApiResponse<AuxiliaryReceipt>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Drafts", description = "Auto-saved form drafts keyed by session id"),
        (name = "Reservations", description = "Booking submissions"),
        (name = "Orders", description = "Checkout submissions"),
        (name = "Auxiliary", description = "Out-of-band forms such as waivers"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_cart_and_draft_schemas() {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;
        for name in ["CartItem", "FormSnapshot", "DraftSnapshot", "SessionId"] {
            assert!(schemas.contains_key(name), "missing schema {name}");
        }
    }
}
