use crate::models::airplane_type::{AirplaneType, AirplaneTypePatch, AirplaneTypeRequest};
use crate::services::airplane_type_service::AirplaneTypeService;
use crate::utils::body::JsonBody;
use crate::utils::error::AppError;
use crate::utils::jwt::StaffUser;
use crate::utils::response::{Created, NoContent};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

#[openapi(tag = "Airplane types")]
#[get("/airplane-types")]
pub async fn list_airplane_types(
    _staff: StaffUser,
    airplane_type_service: &State<AirplaneTypeService>,
) -> Result<Json<Vec<AirplaneType>>, AppError> {
    Ok(Json(airplane_type_service.list_airplane_types().await?))
}

#[openapi(tag = "Airplane types")]
#[get("/airplane-types/<id>")]
pub async fn get_airplane_type(
    id: i32,
    _staff: StaffUser,
    airplane_type_service: &State<AirplaneTypeService>,
) -> Result<Json<AirplaneType>, AppError> {
    Ok(Json(airplane_type_service.get_airplane_type(id).await?))
}

#[openapi(tag = "Airplane types")]
#[post("/airplane-types", data = "<request>")]
pub async fn create_airplane_type(
    _staff: StaffUser,
    request: JsonBody<AirplaneTypeRequest>,
    airplane_type_service: &State<AirplaneTypeService>,
) -> Result<Created<AirplaneType>, AppError> {
    let airplane_type = airplane_type_service
        .create_airplane_type(request.into_inner())
        .await?;
    Ok(Created(airplane_type))
}

#[openapi(tag = "Airplane types")]
#[put("/airplane-types/<id>", data = "<request>")]
pub async fn update_airplane_type(
    id: i32,
    _staff: StaffUser,
    request: JsonBody<AirplaneTypeRequest>,
    airplane_type_service: &State<AirplaneTypeService>,
) -> Result<Json<AirplaneType>, AppError> {
    let airplane_type = airplane_type_service
        .update_airplane_type(id, request.into_inner())
        .await?;
    Ok(Json(airplane_type))
}

#[openapi(tag = "Airplane types")]
#[patch("/airplane-types/<id>", data = "<patch>")]
pub async fn patch_airplane_type(
    id: i32,
    _staff: StaffUser,
    patch: JsonBody<AirplaneTypePatch>,
    airplane_type_service: &State<AirplaneTypeService>,
) -> Result<Json<AirplaneType>, AppError> {
    Ok(Json(airplane_type_service.patch_airplane_type(id, patch.into_inner()).await?))
}

/// Delete an airplane type along with its airplanes
#[openapi(tag = "Airplane types")]
#[delete("/airplane-types/<id>")]
pub async fn delete_airplane_type(
    id: i32,
    _staff: StaffUser,
    airplane_type_service: &State<AirplaneTypeService>,
) -> Result<NoContent, AppError> {
    airplane_type_service.delete_airplane_type(id).await?;
    Ok(NoContent)
}
