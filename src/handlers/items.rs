//! `/items` handlers.

use crate::auth::permissions::{CreateItems, DeleteItems, GetItems, UpdateItems};
use crate::error::{AppError, ErrorBody};
use crate::extractors::Authorized;
use crate::model::{Item, ItemPatch, NewItem};
use crate::response::{success, Success};
use crate::service::{ItemService, Validate};
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("item {} not found", id))
}

#[utoipa::path(
    get,
    path = "/items",
    responses(
        (status = 200, description = "All items"),
        (status = 401, description = "Missing or insufficient credential", body = ErrorBody),
    ),
    security(("bearer_auth" = ["get:items"])),
    tag = "items"
)]
pub async fn list_items(
    _auth: Authorized<GetItems>,
    State(state): State<AppState>,
) -> Result<Success<Vec<Item>>, AppError> {
    let items = ItemService::list(&state.pool).await?;
    Ok(success("items", items))
}

#[utoipa::path(
    get,
    path = "/items/{id}",
    params(("id" = i32, Path, description = "Item id")),
    responses(
        (status = 200, description = "One item", body = Item),
        (status = 404, description = "No such item", body = ErrorBody),
    ),
    security(("bearer_auth" = ["get:items"])),
    tag = "items"
)]
pub async fn get_item(
    _auth: Authorized<GetItems>,
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Success<Item>, AppError> {
    let Path(id) = id?;
    let item = ItemService::find(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(success("item", item))
}

#[utoipa::path(
    post,
    path = "/items",
    request_body = NewItem,
    responses(
        (status = 200, description = "Item created"),
        (status = 400, description = "Malformed body", body = ErrorBody),
        (status = 409, description = "Merchant does not exist", body = ErrorBody),
    ),
    security(("bearer_auth" = ["create:items"])),
    tag = "items"
)]
pub async fn create_item(
    _auth: Authorized<CreateItems>,
    State(state): State<AppState>,
    body: Result<Json<NewItem>, JsonRejection>,
) -> Result<Success<Item>, AppError> {
    let Json(new) = body?;
    new.validate()?;
    let item = ItemService::insert(&state.pool, &new).await?;
    tracing::info!(id = item.id, merchant_id = item.merchant_id, "item created");
    Ok(success("item", item))
}

#[utoipa::path(
    patch,
    path = "/items/{id}",
    params(("id" = i32, Path, description = "Item id")),
    request_body = ItemPatch,
    responses(
        (status = 200, description = "Item updated"),
        (status = 404, description = "No such item", body = ErrorBody),
        (status = 409, description = "Merchant does not exist", body = ErrorBody),
    ),
    security(("bearer_auth" = ["update:items"])),
    tag = "items"
)]
pub async fn update_item(
    _auth: Authorized<UpdateItems>,
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<ItemPatch>, JsonRejection>,
) -> Result<Success<Item>, AppError> {
    let Path(id) = id?;
    let Json(patch) = body?;
    patch.validate()?;
    let item = ItemService::update(&state.pool, id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(success("item", item))
}

#[utoipa::path(
    delete,
    path = "/items/{id}",
    params(("id" = i32, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item deleted; body is the item as it was"),
        (status = 404, description = "No such item", body = ErrorBody),
    ),
    security(("bearer_auth" = ["delete:items"])),
    tag = "items"
)]
pub async fn delete_item(
    _auth: Authorized<DeleteItems>,
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Success<Item>, AppError> {
    let Path(id) = id?;
    let item = ItemService::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(success("item", item))
}
