use crate::models::crew::{CrewDetail, CrewPatch, CrewRequest, FlightShortList};
use crate::services::crew_service::CrewService;
use crate::utils::body::JsonBody;
use crate::utils::error::AppError;
use crate::utils::jwt::StaffUser;
use crate::utils::response::{Created, NoContent};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

#[openapi(tag = "Crews")]
#[get("/crews")]
pub async fn list_crews(
    _staff: StaffUser,
    crew_service: &State<CrewService>,
) -> Result<Json<Vec<CrewDetail>>, AppError> {
    Ok(Json(crew_service.list_crews().await?))
}

#[openapi(tag = "Crews")]
#[get("/crews/<id>")]
pub async fn get_crew(
    id: i32,
    _staff: StaffUser,
    crew_service: &State<CrewService>,
) -> Result<Json<CrewDetail>, AppError> {
    Ok(Json(crew_service.get_crew(id).await?))
}

#[openapi(tag = "Crews")]
#[post("/crews", data = "<request>")]
pub async fn create_crew(
    _staff: StaffUser,
    request: JsonBody<CrewRequest>,
    crew_service: &State<CrewService>,
) -> Result<Created<CrewDetail>, AppError> {
    Ok(Created(crew_service.create_crew(request.into_inner()).await?))
}

#[openapi(tag = "Crews")]
#[put("/crews/<id>", data = "<request>")]
pub async fn update_crew(
    id: i32,
    _staff: StaffUser,
    request: JsonBody<CrewRequest>,
    crew_service: &State<CrewService>,
) -> Result<Json<CrewDetail>, AppError> {
    Ok(Json(crew_service.update_crew(id, request.into_inner()).await?))
}

#[openapi(tag = "Crews")]
#[patch("/crews/<id>", data = "<patch>")]
pub async fn patch_crew(
    id: i32,
    _staff: StaffUser,
    patch: JsonBody<CrewPatch>,
    crew_service: &State<CrewService>,
) -> Result<Json<CrewDetail>, AppError> {
    Ok(Json(crew_service.patch_crew(id, patch.into_inner()).await?))
}

#[openapi(tag = "Crews")]
#[delete("/crews/<id>")]
pub async fn delete_crew(
    id: i32,
    _staff: StaffUser,
    crew_service: &State<CrewService>,
) -> Result<NoContent, AppError> {
    crew_service.delete_crew(id).await?;
    Ok(NoContent)
}

/// Flights the crew member is assigned to, as route labels
#[openapi(tag = "Crews")]
#[get("/crews/<id>/flights")]
pub async fn list_crew_flights(
    id: i32,
    _staff: StaffUser,
    crew_service: &State<CrewService>,
) -> Result<Json<Vec<FlightShortList>>, AppError> {
    Ok(Json(crew_service.list_crew_flights(id).await?))
}

// The crew flight list is read-only

#[post("/crews/<_id>/flights")]
pub fn create_crew_flight(_id: i32, _staff: StaffUser) -> AppError {
    AppError::method_not_allowed("POST")
}

#[put("/crews/<_id>/flights")]
pub fn update_crew_flights(_id: i32, _staff: StaffUser) -> AppError {
    AppError::method_not_allowed("PUT")
}

#[patch("/crews/<_id>/flights")]
pub fn patch_crew_flights(_id: i32, _staff: StaffUser) -> AppError {
    AppError::method_not_allowed("PATCH")
}

#[delete("/crews/<_id>/flights")]
pub fn delete_crew_flights(_id: i32, _staff: StaffUser) -> AppError {
    AppError::method_not_allowed("DELETE")
}
