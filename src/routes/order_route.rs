use crate::models::order::{Order, OrderCreateRequest};
use crate::services::order_service::OrderService;
use crate::utils::body::JsonBody;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use crate::utils::response::Created;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Orders placed by the caller, newest first
#[openapi(tag = "Orders")]
#[get("/orders")]
pub async fn list_orders(
    auth: AuthenticatedUser,
    order_service: &State<OrderService>,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(order_service.list_orders(auth.user_id).await?))
}

/// Place an order
///
/// All tickets are booked together or none are.
#[openapi(tag = "Orders")]
#[post("/orders", data = "<request>")]
pub async fn create_order(
    auth: AuthenticatedUser,
    request: JsonBody<OrderCreateRequest>,
    order_service: &State<OrderService>,
) -> Result<Created<Order>, AppError> {
    let order = order_service
        .create_order(auth.user_id, request.into_inner())
        .await?;
    Ok(Created(order))
}

#[openapi(tag = "Orders")]
#[get("/orders/<id>")]
pub async fn get_order(
    id: i32,
    auth: AuthenticatedUser,
    order_service: &State<OrderService>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(order_service.get_order(auth.user_id, id).await?))
}

// Orders are immutable once placed; tickets are edited through the nested
// resource

#[put("/orders")]
pub fn replace_orders(_auth: AuthenticatedUser) -> AppError {
    AppError::method_not_allowed("PUT")
}

#[patch("/orders")]
pub fn patch_orders(_auth: AuthenticatedUser) -> AppError {
    AppError::method_not_allowed("PATCH")
}

#[delete("/orders")]
pub fn delete_orders(_auth: AuthenticatedUser) -> AppError {
    AppError::method_not_allowed("DELETE")
}

#[post("/orders/<_id>")]
pub fn post_order(_id: i32, _auth: AuthenticatedUser) -> AppError {
    AppError::method_not_allowed("POST")
}

#[put("/orders/<_id>")]
pub fn update_order(_id: i32, _auth: AuthenticatedUser) -> AppError {
    AppError::method_not_allowed("PUT")
}

#[patch("/orders/<_id>")]
pub fn patch_order(_id: i32, _auth: AuthenticatedUser) -> AppError {
    AppError::method_not_allowed("PATCH")
}

#[delete("/orders/<_id>")]
pub fn delete_order(_id: i32, _auth: AuthenticatedUser) -> AppError {
    AppError::method_not_allowed("DELETE")
}
