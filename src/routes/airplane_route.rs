use crate::config::AppConfig;
use crate::models::airplane::{AirplaneDetail, AirplaneImage, AirplanePatch, AirplaneRequest};
use crate::services::airplane_service::AirplaneService;
use crate::utils::body::JsonBody;
use crate::utils::error::AppError;
use crate::utils::jwt::StaffUser;
use crate::utils::response::{Created, NoContent};
use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Multipart body of the image upload
#[derive(FromForm)]
pub struct ImageUpload<'r> {
    pub image: TempFile<'r>,
}

/// List airplanes with their seat capacity
#[openapi(tag = "Airplanes")]
#[get("/airplanes")]
pub async fn list_airplanes(
    _staff: StaffUser,
    airplane_service: &State<AirplaneService>,
) -> Result<Json<Vec<AirplaneDetail>>, AppError> {
    Ok(Json(airplane_service.list_airplanes().await?))
}

#[openapi(tag = "Airplanes")]
#[get("/airplanes/<id>")]
pub async fn get_airplane(
    id: i32,
    _staff: StaffUser,
    airplane_service: &State<AirplaneService>,
) -> Result<Json<AirplaneDetail>, AppError> {
    Ok(Json(airplane_service.get_airplane(id).await?))
}

#[openapi(tag = "Airplanes")]
#[post("/airplanes", data = "<request>")]
pub async fn create_airplane(
    _staff: StaffUser,
    request: JsonBody<AirplaneRequest>,
    airplane_service: &State<AirplaneService>,
) -> Result<Created<AirplaneDetail>, AppError> {
    Ok(Created(airplane_service.create_airplane(request.into_inner()).await?))
}

#[openapi(tag = "Airplanes")]
#[put("/airplanes/<id>", data = "<request>")]
pub async fn update_airplane(
    id: i32,
    _staff: StaffUser,
    request: JsonBody<AirplaneRequest>,
    airplane_service: &State<AirplaneService>,
) -> Result<Json<AirplaneDetail>, AppError> {
    Ok(Json(airplane_service.update_airplane(id, request.into_inner()).await?))
}

/// Rename or resize an airplane; the image is kept
#[openapi(tag = "Airplanes")]
#[patch("/airplanes/<id>", data = "<patch>")]
pub async fn patch_airplane(
    id: i32,
    _staff: StaffUser,
    patch: JsonBody<AirplanePatch>,
    airplane_service: &State<AirplaneService>,
) -> Result<Json<AirplaneDetail>, AppError> {
    Ok(Json(airplane_service.patch_airplane(id, patch.into_inner()).await?))
}

#[openapi(tag = "Airplanes")]
#[delete("/airplanes/<id>")]
pub async fn delete_airplane(
    id: i32,
    _staff: StaffUser,
    airplane_service: &State<AirplaneService>,
) -> Result<NoContent, AppError> {
    airplane_service.delete_airplane(id).await?;
    Ok(NoContent)
}

/// Attach a picture to an airplane (multipart field `image`)
#[openapi(skip)]
#[post("/airplanes/<id>/upload-image", data = "<upload>")]
pub async fn upload_image(
    id: i32,
    _staff: StaffUser,
    mut upload: Form<ImageUpload<'_>>,
    airplane_service: &State<AirplaneService>,
    config: &State<AppConfig>,
) -> Result<Json<AirplaneImage>, AppError> {
    let image = airplane_service
        .upload_image(id, &mut upload.image, &config.media_root)
        .await?;
    Ok(Json(image))
}
