//! `/customers` handlers, including favorites and purchases.

use crate::auth::permissions::{CreateCustomers, DeleteCustomers, GetCustomers, UpdateCustomers};
use crate::error::{AppError, ErrorBody};
use crate::extractors::Authorized;
use crate::model::{AssociationRequest, Customer, CustomerPatch, NewCustomer};
use crate::response::{success, Success};
use crate::service::{CustomerService, Validate};
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("customer {} not found", id))
}

#[utoipa::path(
    get,
    path = "/customers",
    responses(
        (status = 200, description = "All customers with favorites and purchases"),
        (status = 401, description = "Missing or insufficient credential", body = ErrorBody),
    ),
    security(("bearer_auth" = ["get:customers"])),
    tag = "customers"
)]
pub async fn list_customers(
    _auth: Authorized<GetCustomers>,
    State(state): State<AppState>,
) -> Result<Success<Vec<Customer>>, AppError> {
    let customers = CustomerService::list(&state.pool).await?;
    Ok(success("customers", customers))
}

#[utoipa::path(
    get,
    path = "/customers/{id}",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "One customer"),
        (status = 404, description = "No such customer", body = ErrorBody),
    ),
    security(("bearer_auth" = ["get:customers"])),
    tag = "customers"
)]
pub async fn get_customer(
    _auth: Authorized<GetCustomers>,
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Success<Customer>, AppError> {
    let Path(id) = id?;
    let customer = CustomerService::find(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(success("customer", customer))
}

#[utoipa::path(
    post,
    path = "/customers",
    request_body = NewCustomer,
    responses(
        (status = 200, description = "Customer created"),
        (status = 400, description = "Malformed body", body = ErrorBody),
    ),
    security(("bearer_auth" = ["create:customers"])),
    tag = "customers"
)]
pub async fn create_customer(
    _auth: Authorized<CreateCustomers>,
    State(state): State<AppState>,
    body: Result<Json<NewCustomer>, JsonRejection>,
) -> Result<Success<Customer>, AppError> {
    let Json(new) = body?;
    new.validate()?;
    let customer = CustomerService::insert(&state.pool, &new).await?;
    tracing::info!(id = customer.id, "customer created");
    Ok(success("customer", customer))
}

#[utoipa::path(
    patch,
    path = "/customers/{id}",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = CustomerPatch,
    responses(
        (status = 200, description = "Customer updated"),
        (status = 404, description = "No such customer", body = ErrorBody),
    ),
    security(("bearer_auth" = ["update:customers"])),
    tag = "customers"
)]
pub async fn update_customer(
    _auth: Authorized<UpdateCustomers>,
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<CustomerPatch>, JsonRejection>,
) -> Result<Success<Customer>, AppError> {
    let Path(id) = id?;
    let Json(patch) = body?;
    patch.validate()?;
    let customer = CustomerService::update(&state.pool, id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(success("customer", customer))
}

#[utoipa::path(
    delete,
    path = "/customers/{id}",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer deleted; body is the customer as it was"),
        (status = 404, description = "No such customer", body = ErrorBody),
    ),
    security(("bearer_auth" = ["delete:customers"])),
    tag = "customers"
)]
pub async fn delete_customer(
    _auth: Authorized<DeleteCustomers>,
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Success<Customer>, AppError> {
    let Path(id) = id?;
    let customer = CustomerService::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(success("customer", customer))
}

#[utoipa::path(
    post,
    path = "/customers/{id}/favorites",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = AssociationRequest,
    responses(
        (status = 200, description = "Favorite added; body is the updated customer"),
        (status = 404, description = "No such customer", body = ErrorBody),
        (status = 409, description = "Already a favorite, or no such item", body = ErrorBody),
    ),
    security(("bearer_auth" = ["update:customers"])),
    tag = "customers"
)]
pub async fn add_favorite(
    _auth: Authorized<UpdateCustomers>,
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<AssociationRequest>, JsonRejection>,
) -> Result<Success<Customer>, AppError> {
    let Path(id) = id?;
    let Json(req) = body?;
    let customer = CustomerService::add_favorite(&state.pool, id, req.item_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(success("customer", customer))
}

#[utoipa::path(
    delete,
    path = "/customers/{id}/favorites/{item_id}",
    params(
        ("id" = i32, Path, description = "Customer id"),
        ("item_id" = i32, Path, description = "Item id"),
    ),
    responses(
        (status = 200, description = "Favorite removed; body is the updated customer"),
        (status = 404, description = "No such customer or favorite", body = ErrorBody),
    ),
    security(("bearer_auth" = ["update:customers"])),
    tag = "customers"
)]
pub async fn remove_favorite(
    _auth: Authorized<UpdateCustomers>,
    State(state): State<AppState>,
    ids: Result<Path<(i32, i32)>, PathRejection>,
) -> Result<Success<Customer>, AppError> {
    let Path((id, item_id)) = ids?;
    let customer = CustomerService::remove_favorite(&state.pool, id, item_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(success("customer", customer))
}

#[utoipa::path(
    post,
    path = "/customers/{id}/purchases",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = AssociationRequest,
    responses(
        (status = 200, description = "Purchase recorded; body is the updated customer"),
        (status = 404, description = "No such customer", body = ErrorBody),
        (status = 409, description = "Already purchased, or no such item", body = ErrorBody),
    ),
    security(("bearer_auth" = ["update:customers"])),
    tag = "customers"
)]
pub async fn add_purchase(
    _auth: Authorized<UpdateCustomers>,
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<AssociationRequest>, JsonRejection>,
) -> Result<Success<Customer>, AppError> {
    let Path(id) = id?;
    let Json(req) = body?;
    let customer = CustomerService::add_purchase(&state.pool, id, req.item_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(success("customer", customer))
}

#[utoipa::path(
    delete,
    path = "/customers/{id}/purchases/{item_id}",
    params(
        ("id" = i32, Path, description = "Customer id"),
        ("item_id" = i32, Path, description = "Item id"),
    ),
    responses(
        (status = 200, description = "Purchase removed; body is the updated customer"),
        (status = 404, description = "No such customer or purchase", body = ErrorBody),
    ),
    security(("bearer_auth" = ["update:customers"])),
    tag = "customers"
)]
pub async fn remove_purchase(
    _auth: Authorized<UpdateCustomers>,
    State(state): State<AppState>,
    ids: Result<Path<(i32, i32)>, PathRejection>,
) -> Result<Success<Customer>, AppError> {
    let Path((id, item_id)) = ids?;
    let customer = CustomerService::remove_purchase(&state.pool, id, item_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(success("customer", customer))
}
