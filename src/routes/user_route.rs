use crate::models::user::{
    RegisterResponse, UserLoginRequest, UserLoginResponse, UserRegistrationRequest,
};
use crate::services::user_service::UserService;
use crate::utils::body::JsonBody;
use crate::utils::error::AppError;
use crate::utils::response::Created;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Register a new user
#[openapi(tag = "Users")]
#[post("/user/register", format = "json", data = "<request>")]
pub async fn register(
    request: JsonBody<UserRegistrationRequest>,
    user_service: &State<UserService>,
) -> Result<Created<RegisterResponse>, AppError> {
    let user_id = user_service.register_user(request.into_inner()).await?;
    Ok(Created(RegisterResponse {
        user_id,
        status: "success".to_string(),
    }))
}

/// Obtain a bearer token
#[openapi(tag = "Users")]
#[post("/user/token", format = "json", data = "<request>")]
pub async fn token(
    request: JsonBody<UserLoginRequest>,
    user_service: &State<UserService>,
) -> Result<Json<UserLoginResponse>, AppError> {
    let response = user_service.login_user(request.into_inner()).await?;
    Ok(Json(response))
}
