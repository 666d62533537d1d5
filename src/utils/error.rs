use log::error;
use rocket::http::ContentType;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::Request;
use rocket::Response;
use rocket_okapi::JsonSchema;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::io::Cursor;
use thiserror::Error;

/// Field name used for errors that are not tied to a single attribute
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Field-scoped validation messages, keyed by attribute name
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Error, Debug, Clone, Serialize, JsonSchema)]
pub enum AppError {
    #[error("Database error")]
    DatabaseError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Validation error")]
    ValidationError(FieldErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// A validation error on a single field
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        AppError::ValidationError(errors)
    }

    /// A validation error not attached to any field
    pub fn non_field(message: impl Into<String>) -> Self {
        Self::field(NON_FIELD_ERRORS, message)
    }

    pub fn method_not_allowed(method: &str) -> Self {
        AppError::MethodNotAllowed(format!("Method \"{}\" not allowed.", method))
    }

    pub fn status(&self) -> Status {
        match self {
            AppError::ValidationError(_) => Status::BadRequest,
            AppError::NotFound(_) => Status::NotFound,
            AppError::DatabaseError(_) => Status::InternalServerError,
            AppError::AuthError(_) => Status::Unauthorized,
            AppError::Forbidden(_) => Status::Forbidden,
            AppError::MethodNotAllowed(_) => Status::MethodNotAllowed,
            AppError::Conflict(_) => Status::Conflict,
            AppError::Unprocessable(_) => Status::UnprocessableEntity,
            AppError::BadRequest(_) => Status::BadRequest,
        }
    }
}

// Convert sqlx::Error (database error) to AppError::DatabaseError
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

// Request bodies are checked with `validator`; struct-level checks land under
// "__all__", which clients know as non_field_errors
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            let key = if field == "__all__" {
                NON_FIELD_ERRORS.to_string()
            } else {
                field.to_string()
            };
            let messages = fields.entry(key).or_default();
            for e in field_errors.iter() {
                match &e.message {
                    Some(message) => messages.push(message.to_string()),
                    None => messages.push(format!("Invalid value ({})", e.code)),
                }
            }
        }
        AppError::ValidationError(fields)
    }
}

/// Storage-level integrity failures that services report as field errors
#[derive(Debug, PartialEq)]
pub enum ConstraintViolation {
    Unique,
    // carries the driver message, which names the violated constraint
    ForeignKey(String),
    Check,
    // SIGNAL raised by a trigger; carries the trigger's message
    Signal(String),
}

pub fn constraint_violation(err: &sqlx::Error) -> Option<ConstraintViolation> {
    let db_err = err.as_database_error()?;
    if db_err.code().as_deref() == Some("45000") {
        return Some(ConstraintViolation::Signal(db_err.message().to_string()));
    }
    match db_err.kind() {
        sqlx::error::ErrorKind::UniqueViolation => Some(ConstraintViolation::Unique),
        sqlx::error::ErrorKind::ForeignKeyViolation => {
            Some(ConstraintViolation::ForeignKey(db_err.message().to_string()))
        }
        sqlx::error::ErrorKind::CheckViolation => Some(ConstraintViolation::Check),
        _ => None,
    }
}

// Define a type alias for the result type
pub type AppResult<T> = Result<T, AppError>;

pub fn error_body(error: &AppError) -> serde_json::Value {
    match error {
        AppError::ValidationError(fields) => json!({
            "error": error.to_string(),
            "fields": fields,
        }),
        _ => json!({
            "error": error.to_string()
        }),
    }
}

// Implement the Responder trait for AppError
// Format all error from route level to a Http Response at route level
#[rocket::async_trait]
impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        let status = self.status();
        if let AppError::DatabaseError(detail) = &self {
            error!("{} {} failed: {}", request.method(), request.uri(), detail);
        }

        let json = error_body(&self);

        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(None, Cursor::new(json.to_string()))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    #[validate(schema(function = "never_valid", skip_on_field_errors = false))]
    struct Payload {
        #[validate(length(min = 1, message = "This field may not be blank."))]
        name: String,
    }

    fn never_valid(_: &Payload) -> Result<(), validator::ValidationError> {
        let mut err = validator::ValidationError::new("never");
        err.message = Some("Always rejected.".into());
        Err(err)
    }

    #[test]
    fn status_codes_follow_variant() {
        assert_eq!(AppError::field("row", "x").status(), Status::BadRequest);
        assert_eq!(AppError::AuthError("x".into()).status(), Status::Unauthorized);
        assert_eq!(AppError::Forbidden("x".into()).status(), Status::Forbidden);
        assert_eq!(AppError::NotFound("x".into()).status(), Status::NotFound);
        assert_eq!(
            AppError::MethodNotAllowed("x".into()).status(),
            Status::MethodNotAllowed
        );
        assert_eq!(
            AppError::DatabaseError("x".into()).status(),
            Status::InternalServerError
        );
    }

    #[test]
    fn validator_errors_become_field_map() {
        let payload = Payload {
            name: String::new(),
        };
        let err: AppError = payload.validate().unwrap_err().into();
        let AppError::ValidationError(fields) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(fields["name"], vec!["This field may not be blank.".to_string()]);
        assert_eq!(fields[NON_FIELD_ERRORS], vec!["Always rejected.".to_string()]);
    }

    #[test]
    fn validation_body_carries_fields() {
        let body = error_body(&AppError::field("seat", "Seat must be in available range: (1, 6)"));
        assert_eq!(body["error"], "Validation error");
        assert_eq!(body["fields"]["seat"][0], "Seat must be in available range: (1, 6)");

        let body = error_body(&AppError::NotFound("Order not found".into()));
        assert_eq!(body["error"], "Not found: Order not found");
        assert!(body.get("fields").is_none());
    }
}
