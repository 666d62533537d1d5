use crate::models::airport::{Airport, AirportDetail, AirportPatch, AirportRequest};
use crate::services::airport_service::AirportService;
use crate::utils::body::JsonBody;
use crate::utils::error::AppError;
use crate::utils::jwt::StaffUser;
use crate::utils::response::{Created, NoContent};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// List airports
#[openapi(tag = "Airports")]
#[get("/airports")]
pub async fn list_airports(
    _staff: StaffUser,
    airport_service: &State<AirportService>,
) -> Result<Json<Vec<AirportDetail>>, AppError> {
    Ok(Json(airport_service.list_airports().await?))
}

/// Get an airport
#[openapi(tag = "Airports")]
#[get("/airports/<id>")]
pub async fn get_airport(
    id: i32,
    _staff: StaffUser,
    airport_service: &State<AirportService>,
) -> Result<Json<AirportDetail>, AppError> {
    Ok(Json(airport_service.get_airport(id).await?))
}

/// Create an airport
#[openapi(tag = "Airports")]
#[post("/airports", data = "<request>")]
pub async fn create_airport(
    _staff: StaffUser,
    request: JsonBody<AirportRequest>,
    airport_service: &State<AirportService>,
) -> Result<Created<Airport>, AppError> {
    Ok(Created(airport_service.create_airport(request.into_inner()).await?))
}

/// Update an airport
#[openapi(tag = "Airports")]
#[put("/airports/<id>", data = "<request>")]
pub async fn update_airport(
    id: i32,
    _staff: StaffUser,
    request: JsonBody<AirportRequest>,
    airport_service: &State<AirportService>,
) -> Result<Json<Airport>, AppError> {
    Ok(Json(airport_service.update_airport(id, request.into_inner()).await?))
}

#[openapi(tag = "Airports")]
#[patch("/airports/<id>", data = "<patch>")]
pub async fn patch_airport(
    id: i32,
    _staff: StaffUser,
    patch: JsonBody<AirportPatch>,
    airport_service: &State<AirportService>,
) -> Result<Json<Airport>, AppError> {
    Ok(Json(airport_service.patch_airport(id, patch.into_inner()).await?))
}

/// Delete an airport and the routes touching it
#[openapi(tag = "Airports")]
#[delete("/airports/<id>")]
pub async fn delete_airport(
    id: i32,
    _staff: StaffUser,
    airport_service: &State<AirportService>,
) -> Result<NoContent, AppError> {
    airport_service.delete_airport(id).await?;
    Ok(NoContent)
}
