use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use rocket_okapi::request::OpenApiFromRequest;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // user_id
    pub staff: bool,
    pub exp: usize,
}

/// Any caller holding a valid bearer token
#[derive(Debug, Clone, Copy, OpenApiFromRequest)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub is_staff: bool,
}

/// A caller whose token carries the staff flag
#[derive(Debug, Clone, Copy, OpenApiFromRequest)]
pub struct StaffUser {
    pub user_id: i32,
}

pub fn generate_token(secret: &str, ttl_hours: i64, user_id: i32, is_staff: bool) -> AppResult<String> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(ttl_hours))
        .ok_or_else(|| AppError::AuthError("Token lifetime out of range".into()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id,
        staff: is_staff,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::AuthError(e.to_string()))
}

pub fn decode_token(secret: &str, token: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::AuthError(e.to_string()))
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = AppError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let token = match request.headers().get_one("Authorization") {
            Some(token) if token.starts_with("Bearer ") => token[7..].to_string(),
            _ => {
                return Outcome::Error((
                    Status::Unauthorized,
                    AppError::AuthError("Authentication credentials were not provided".into()),
                ))
            }
        };

        let config = match request.rocket().state::<AppConfig>() {
            Some(config) => config,
            None => {
                return Outcome::Error((
                    Status::InternalServerError,
                    AppError::DatabaseError("Configuration is not managed".into()),
                ))
            }
        };

        match decode_token(&config.jwt_secret, &token) {
            Ok(claims) => Outcome::Success(AuthenticatedUser {
                user_id: claims.sub,
                is_staff: claims.staff,
            }),
            Err(e) => Outcome::Error((Status::Unauthorized, e)),
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for StaffUser {
    type Error = AppError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match request.guard::<AuthenticatedUser>().await {
            Outcome::Success(user) if user.is_staff => Outcome::Success(StaffUser {
                user_id: user.user_id,
            }),
            Outcome::Success(_) => Outcome::Error((
                Status::Forbidden,
                AppError::Forbidden("You do not have permission to perform this action".into()),
            )),
            Outcome::Error(e) => Outcome::Error(e),
            Outcome::Forward(status) => Outcome::Forward(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_keeps_identity_and_role() {
        let token = generate_token("secret", 1, 42, true).unwrap();
        let claims = decode_token("secret", &token).unwrap();

        assert_eq!(claims.sub, 42);
        assert!(claims.staff);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = generate_token("secret", 1, 42, false).unwrap();

        assert!(matches!(
            decode_token("another", &token),
            Err(AppError::AuthError(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        // default validation allows 60s of leeway
        let token = generate_token("secret", -2, 42, false).unwrap();

        assert!(decode_token("secret", &token).is_err());
    }
}
