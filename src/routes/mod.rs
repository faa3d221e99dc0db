use axum::Router;

use crate::state::AppState;

pub mod auxiliary;
pub mod doc;
pub mod drafts;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;
pub mod reservations;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/drafts", drafts::router())
        .nest("/reservations", reservations::router())
        .nest("/orders", orders::router())
        .nest("/auxiliary", auxiliary::router())
}
