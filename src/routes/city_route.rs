use crate::models::city::{City, CityDetail, CityPatch, CityRequest};
use crate::services::city_service::CityService;
use crate::utils::body::JsonBody;
use crate::utils::error::AppError;
use crate::utils::jwt::StaffUser;
use crate::utils::response::{Created, NoContent};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

// Cities are staff-only, reads included

/// List cities
#[openapi(tag = "Cities")]
#[get("/cities")]
pub async fn list_cities(
    _staff: StaffUser,
    city_service: &State<CityService>,
) -> Result<Json<Vec<CityDetail>>, AppError> {
    Ok(Json(city_service.list_cities().await?))
}

/// Get a city
#[openapi(tag = "Cities")]
#[get("/cities/<id>")]
pub async fn get_city(
    id: i32,
    _staff: StaffUser,
    city_service: &State<CityService>,
) -> Result<Json<CityDetail>, AppError> {
    Ok(Json(city_service.get_city(id).await?))
}

/// Create a city
#[openapi(tag = "Cities")]
#[post("/cities", data = "<request>")]
pub async fn create_city(
    _staff: StaffUser,
    request: JsonBody<CityRequest>,
    city_service: &State<CityService>,
) -> Result<Created<City>, AppError> {
    Ok(Created(city_service.create_city(request.into_inner()).await?))
}

/// Update a city
#[openapi(tag = "Cities")]
#[put("/cities/<id>", data = "<request>")]
pub async fn update_city(
    id: i32,
    _staff: StaffUser,
    request: JsonBody<CityRequest>,
    city_service: &State<CityService>,
) -> Result<Json<City>, AppError> {
    Ok(Json(city_service.update_city(id, request.into_inner()).await?))
}

#[openapi(tag = "Cities")]
#[patch("/cities/<id>", data = "<patch>")]
pub async fn patch_city(
    id: i32,
    _staff: StaffUser,
    patch: JsonBody<CityPatch>,
    city_service: &State<CityService>,
) -> Result<Json<City>, AppError> {
    Ok(Json(city_service.patch_city(id, patch.into_inner()).await?))
}

/// Delete a city
#[openapi(tag = "Cities")]
#[delete("/cities/<id>")]
pub async fn delete_city(
    id: i32,
    _staff: StaffUser,
    city_service: &State<CityService>,
) -> Result<NoContent, AppError> {
    city_service.delete_city(id).await?;
    Ok(NoContent)
}
