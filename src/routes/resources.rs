//! Resource routes: `/merchants`, `/items`, `/customers`.
//! Each handler declares its permission through its `Authorized<_>` extractor.

use crate::handlers::{
    add_favorite, add_purchase, create_customer, create_item, create_merchant, delete_customer,
    delete_item, delete_merchant, get_customer, get_item, get_merchant, list_customers, list_items,
    list_merchants, remove_favorite, remove_purchase, update_customer, update_item, update_merchant,
};
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn resource_routes(state: AppState) -> Router {
    Router::new()
        .route("/merchants", get(list_merchants).post(create_merchant))
        .route(
            "/merchants/:id",
            get(get_merchant).patch(update_merchant).delete(delete_merchant),
        )
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/:id",
            get(get_item).patch(update_item).delete(delete_item),
        )
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/:id",
            get(get_customer).patch(update_customer).delete(delete_customer),
        )
        .route("/customers/:id/favorites", post(add_favorite))
        .route("/customers/:id/favorites/:item_id", delete(remove_favorite))
        .route("/customers/:id/purchases", post(add_purchase))
        .route("/customers/:id/purchases/:item_id", delete(remove_purchase))
        .with_state(state)
}
