use crate::models::country::{Country, CountryPatch, CountryRequest};
use crate::services::country_service::CountryService;
use crate::utils::body::JsonBody;
use crate::utils::error::AppError;
use crate::utils::jwt::{AuthenticatedUser, StaffUser};
use crate::utils::response::{Created, NoContent};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// List countries
#[openapi(tag = "Countries")]
#[get("/countries")]
pub async fn list_countries(
    _auth: AuthenticatedUser,
    country_service: &State<CountryService>,
) -> Result<Json<Vec<Country>>, AppError> {
    Ok(Json(country_service.list_countries().await?))
}

/// Get a country
#[openapi(tag = "Countries")]
#[get("/countries/<id>")]
pub async fn get_country(
    id: i32,
    _auth: AuthenticatedUser,
    country_service: &State<CountryService>,
) -> Result<Json<Country>, AppError> {
    Ok(Json(country_service.get_country(id).await?))
}

/// Create a country
#[openapi(tag = "Countries")]
#[post("/countries", data = "<request>")]
pub async fn create_country(
    _staff: StaffUser,
    request: JsonBody<CountryRequest>,
    country_service: &State<CountryService>,
) -> Result<Created<Country>, AppError> {
    Ok(Created(country_service.create_country(request.into_inner()).await?))
}

/// Update a country
#[openapi(tag = "Countries")]
#[put("/countries/<id>", data = "<request>")]
pub async fn update_country(
    id: i32,
    _staff: StaffUser,
    request: JsonBody<CountryRequest>,
    country_service: &State<CountryService>,
) -> Result<Json<Country>, AppError> {
    Ok(Json(country_service.update_country(id, request.into_inner()).await?))
}

#[openapi(tag = "Countries")]
#[patch("/countries/<id>", data = "<patch>")]
pub async fn patch_country(
    id: i32,
    _staff: StaffUser,
    patch: JsonBody<CountryPatch>,
    country_service: &State<CountryService>,
) -> Result<Json<Country>, AppError> {
    Ok(Json(country_service.patch_country(id, patch.into_inner()).await?))
}

/// Delete a country and its cities
#[openapi(tag = "Countries")]
#[delete("/countries/<id>")]
pub async fn delete_country(
    id: i32,
    _staff: StaffUser,
    country_service: &State<CountryService>,
) -> Result<NoContent, AppError> {
    country_service.delete_country(id).await?;
    Ok(NoContent)
}
