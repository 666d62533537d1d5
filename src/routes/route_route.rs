use crate::models::route::{Route, RouteDetail, RoutePatch, RouteRequest};
use crate::services::route_service::RouteService;
use crate::utils::body::JsonBody;
use crate::utils::error::AppError;
use crate::utils::jwt::{AuthenticatedUser, StaffUser};
use crate::utils::response::{Created, NoContent};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// List routes with airport names
#[openapi(tag = "Routes")]
#[get("/routes")]
pub async fn list_routes(
    _auth: AuthenticatedUser,
    route_service: &State<RouteService>,
) -> Result<Json<Vec<RouteDetail>>, AppError> {
    Ok(Json(route_service.list_routes().await?))
}

#[openapi(tag = "Routes")]
#[get("/routes/<id>")]
pub async fn get_route(
    id: i32,
    _auth: AuthenticatedUser,
    route_service: &State<RouteService>,
) -> Result<Json<RouteDetail>, AppError> {
    Ok(Json(route_service.get_route(id).await?))
}

/// Create a route between two distinct airports
#[openapi(tag = "Routes")]
#[post("/routes", data = "<request>")]
pub async fn create_route(
    _staff: StaffUser,
    request: JsonBody<RouteRequest>,
    route_service: &State<RouteService>,
) -> Result<Created<Route>, AppError> {
    Ok(Created(route_service.create_route(request.into_inner()).await?))
}

#[openapi(tag = "Routes")]
#[put("/routes/<id>", data = "<request>")]
pub async fn update_route(
    id: i32,
    _staff: StaffUser,
    request: JsonBody<RouteRequest>,
    route_service: &State<RouteService>,
) -> Result<Json<Route>, AppError> {
    Ok(Json(route_service.update_route(id, request.into_inner()).await?))
}

#[openapi(tag = "Routes")]
#[patch("/routes/<id>", data = "<patch>")]
pub async fn patch_route(
    id: i32,
    _staff: StaffUser,
    patch: JsonBody<RoutePatch>,
    route_service: &State<RouteService>,
) -> Result<Json<Route>, AppError> {
    Ok(Json(route_service.patch_route(id, patch.into_inner()).await?))
}

/// Delete a route and its flights
#[openapi(tag = "Routes")]
#[delete("/routes/<id>")]
pub async fn delete_route(
    id: i32,
    _staff: StaffUser,
    route_service: &State<RouteService>,
) -> Result<NoContent, AppError> {
    route_service.delete_route(id).await?;
    Ok(NoContent)
}
