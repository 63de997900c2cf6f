//! OpenAPI document for the resource routes, served at `/openapi.json`.

use crate::error::ErrorBody;
use crate::handlers::{customers, items, merchants};
use crate::model::{
    AssociationRequest, Customer, CustomerPatch, Item, ItemPatch, Merchant, MerchantPatch,
    NewCustomer, NewItem, NewMerchant,
};
use axum::{routing::get, Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "JWT whose `permissions` claim holds strings such as `get:items`.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SideBoard API",
        description = "Merchants, items and customers of the SideBoard marketplace.\n\nEvery response is an envelope: `{success: true, <resource>: ...}` or `{success: false, status, error, message}`."
    ),
    paths(
        merchants::list_merchants,
        merchants::get_merchant,
        merchants::create_merchant,
        merchants::update_merchant,
        merchants::delete_merchant,
        items::list_items,
        items::get_item,
        items::create_item,
        items::update_item,
        items::delete_item,
        customers::list_customers,
        customers::get_customer,
        customers::create_customer,
        customers::update_customer,
        customers::delete_customer,
        customers::add_favorite,
        customers::remove_favorite,
        customers::add_purchase,
        customers::remove_purchase,
    ),
    components(schemas(
        Merchant,
        NewMerchant,
        MerchantPatch,
        Item,
        NewItem,
        ItemPatch,
        Customer,
        NewCustomer,
        CustomerPatch,
        AssociationRequest,
        ErrorBody,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "merchants", description = "Sellers and their items"),
        (name = "items", description = "Products"),
        (name = "customers", description = "Buyers, favorites and purchases"),
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn openapi_routes() -> Router {
    Router::new().route("/openapi.json", get(openapi_json))
}
