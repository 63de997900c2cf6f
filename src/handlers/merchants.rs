//! `/merchants` handlers.

use crate::auth::permissions::{CreateMerchants, DeleteMerchants, GetMerchants, UpdateMerchants};
use crate::error::{AppError, ErrorBody};
use crate::extractors::Authorized;
use crate::model::{Merchant, MerchantPatch, NewMerchant};
use crate::response::{success, Success};
use crate::service::{MerchantService, Validate};
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("merchant {} not found", id))
}

#[utoipa::path(
    get,
    path = "/merchants",
    responses(
        (status = 200, description = "All merchants with their items"),
        (status = 401, description = "Missing or insufficient credential", body = ErrorBody),
    ),
    security(("bearer_auth" = ["get:merchants"])),
    tag = "merchants"
)]
pub async fn list_merchants(
    _auth: Authorized<GetMerchants>,
    State(state): State<AppState>,
) -> Result<Success<Vec<Merchant>>, AppError> {
    let merchants = MerchantService::list(&state.pool).await?;
    Ok(success("merchants", merchants))
}

#[utoipa::path(
    get,
    path = "/merchants/{id}",
    params(("id" = i32, Path, description = "Merchant id")),
    responses(
        (status = 200, description = "One merchant with its items"),
        (status = 404, description = "No such merchant", body = ErrorBody),
    ),
    security(("bearer_auth" = ["get:merchants"])),
    tag = "merchants"
)]
pub async fn get_merchant(
    _auth: Authorized<GetMerchants>,
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Success<Merchant>, AppError> {
    let Path(id) = id?;
    let merchant = MerchantService::find(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(success("merchant", merchant))
}

#[utoipa::path(
    post,
    path = "/merchants",
    request_body = NewMerchant,
    responses(
        (status = 200, description = "Merchant created"),
        (status = 400, description = "Malformed body", body = ErrorBody),
        (status = 409, description = "Name already taken", body = ErrorBody),
    ),
    security(("bearer_auth" = ["create:merchants"])),
    tag = "merchants"
)]
pub async fn create_merchant(
    _auth: Authorized<CreateMerchants>,
    State(state): State<AppState>,
    body: Result<Json<NewMerchant>, JsonRejection>,
) -> Result<Success<Merchant>, AppError> {
    let Json(new) = body?;
    new.validate()?;
    let merchant = MerchantService::insert(&state.pool, &new).await?;
    tracing::info!(id = merchant.id, "merchant created");
    Ok(success("merchant", merchant))
}

#[utoipa::path(
    patch,
    path = "/merchants/{id}",
    params(("id" = i32, Path, description = "Merchant id")),
    request_body = MerchantPatch,
    responses(
        (status = 200, description = "Merchant updated"),
        (status = 404, description = "No such merchant", body = ErrorBody),
        (status = 409, description = "Name already taken", body = ErrorBody),
    ),
    security(("bearer_auth" = ["update:merchants"])),
    tag = "merchants"
)]
pub async fn update_merchant(
    _auth: Authorized<UpdateMerchants>,
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<MerchantPatch>, JsonRejection>,
) -> Result<Success<Merchant>, AppError> {
    let Path(id) = id?;
    let Json(patch) = body?;
    patch.validate()?;
    let merchant = MerchantService::update(&state.pool, id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(success("merchant", merchant))
}

#[utoipa::path(
    delete,
    path = "/merchants/{id}",
    params(("id" = i32, Path, description = "Merchant id")),
    responses(
        (status = 200, description = "Merchant and its items deleted; body is the merchant as it was"),
        (status = 404, description = "No such merchant", body = ErrorBody),
    ),
    security(("bearer_auth" = ["delete:merchants"])),
    tag = "merchants"
)]
pub async fn delete_merchant(
    _auth: Authorized<DeleteMerchants>,
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Success<Merchant>, AppError> {
    let Path(id) = id?;
    let merchant = MerchantService::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(id, items = merchant.items.len(), "merchant deleted");
    Ok(success("merchant", merchant))
}
