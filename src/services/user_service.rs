use crate::config::AppConfig;
use crate::models::Resource;
use crate::models::user::{User, UserLoginRequest, UserLoginResponse, UserRegistrationRequest};
use crate::utils::error::{constraint_violation, AppError, AppResult, ConstraintViolation};
use crate::utils::jwt;
use bcrypt::{hash, verify, DEFAULT_COST};
use log::{info, warn};
use sqlx::MySqlPool;
use validator::Validate;

pub struct UserService {
    pool: MySqlPool,
    jwt_secret: String,
    token_ttl_hours: i64,
}

impl UserService {
    pub fn new(pool: MySqlPool, config: &AppConfig) -> Self {
        UserService {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            token_ttl_hours: config.token_ttl_hours,
        }
    }

    // Register a new user; accounts created here are never staff
    pub async fn register_user(&self, request: UserRegistrationRequest) -> AppResult<i32> {
        request.validate()?;

        // Check if email already exists
        let existing_user = sqlx::query("SELECT id FROM users WHERE email = ?")
            .bind(&request.email)
            .fetch_optional(&self.pool)
            .await?;

        if existing_user.is_some() {
            return Err(AppError::Conflict("User with this email already exists".into()));
        }

        // Hash password
        let hashed_password = hash(request.password.as_bytes(), DEFAULT_COST)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        // Insert user; a concurrent registration can still hit the unique key
        let result = sqlx::query("INSERT INTO users (email, password, is_staff) VALUES (?, ?, FALSE)")
            .bind(&request.email)
            .bind(hashed_password)
            .execute(&self.pool)
            .await
            .map_err(|e| match constraint_violation(&e) {
                Some(ConstraintViolation::Unique) => {
                    AppError::Conflict("User with this email already exists".into())
                }
                _ => e.into(),
            })?;

        let user_id = result.last_insert_id() as i32;
        info!("Registered user {}", user_id);
        Ok(user_id)
    }

    // Login user
    pub async fn login_user(&self, request: UserLoginRequest) -> AppResult<UserLoginResponse> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password, is_staff FROM users WHERE email = ?",
        )
        .bind(&request.email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::AuthError("Invalid credentials".into()))?;

        // Verify password
        let password_matches = verify(request.password.as_bytes(), &user.password)
            .map_err(|e| AppError::AuthError(e.to_string()))?;

        if !password_matches {
            return Err(AppError::AuthError("Invalid credentials".into()));
        }

        // Generate JWT token
        let token = jwt::generate_token(&self.jwt_secret, self.token_ttl_hours, user.id, user.is_staff)?;

        Ok(UserLoginResponse {
            token,
            user_id: user.id,
        })
    }

    /// Grants or revokes staff rights. Not reachable over HTTP.
    pub async fn set_staff(&self, user_id: i32, is_staff: bool) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT id FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Resource::User.not_found())?;

        sqlx::query("UPDATE users SET is_staff = ? WHERE id = ?")
            .bind(is_staff)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Makes the account registered under `email` staff. Returns false when
    /// no such account exists yet.
    pub async fn promote_to_staff(&self, email: &str) -> AppResult<bool> {
        let user_id = sqlx::query_scalar::<_, i32>("SELECT id FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        match user_id {
            Some(user_id) => {
                self.set_staff(user_id, true).await?;
                info!("User {} ({}) granted staff rights", user_id, email);
                Ok(true)
            }
            None => {
                warn!("No user registered as {}; staff rights not granted", email);
                Ok(false)
            }
        }
    }
}
