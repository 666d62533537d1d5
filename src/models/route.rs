use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const SAME_ENDPOINTS_MESSAGE: &str = "The source and the destination can't be the same.";

#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Route {
    pub id: i32,
    pub source: i32,
    pub destination: i32,
    pub distance: i32,
}

// Airports rendered by name
#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct RouteDetail {
    pub id: i32,
    pub source: String,
    pub destination: String,
    pub distance: i32,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
#[validate(schema(function = "validate_route_endpoints", skip_on_field_errors = false))]
pub struct RouteRequest {
    pub source: i32,
    pub destination: i32,
    #[validate(range(min = 1, message = "Distance must be a positive number."))]
    pub distance: i32,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct RoutePatch {
    pub source: Option<i32>,
    pub destination: Option<i32>,
    pub distance: Option<i32>,
}

impl RoutePatch {
    pub fn merge(self, current: Route) -> RouteRequest {
        RouteRequest {
            source: self.source.unwrap_or(current.source),
            destination: self.destination.unwrap_or(current.destination),
            distance: self.distance.unwrap_or(current.distance),
        }
    }
}

pub fn validate_route_endpoints(request: &RouteRequest) -> Result<(), ValidationError> {
    if request.source == request.destination {
        let mut err = ValidationError::new("same_endpoints");
        err.message = Some(SAME_ENDPOINTS_MESSAGE.into());
        return Err(err);
    }
    Ok(())
}

/// "<id>. <source> - <destination>", the label flights use for their route
pub fn route_label(id: i32, source: &str, destination: &str) -> String {
    format!("{}. {} - {}", id, source, destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::{AppError, NON_FIELD_ERRORS};

    #[test]
    fn self_loop_is_a_non_field_error() {
        let request = RouteRequest {
            source: 3,
            destination: 3,
            distance: 120,
        };
        let err: AppError = request.validate().unwrap_err().into();
        let AppError::ValidationError(fields) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(fields[NON_FIELD_ERRORS], vec![SAME_ENDPOINTS_MESSAGE.to_string()]);
    }

    #[test]
    fn distinct_endpoints_pass() {
        let request = RouteRequest {
            source: 1,
            destination: 2,
            distance: 120,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn zero_distance_and_self_loop_both_reported() {
        let request = RouteRequest {
            source: 1,
            destination: 1,
            distance: 0,
        };
        let err: AppError = request.validate().unwrap_err().into();
        let AppError::ValidationError(fields) = err else {
            panic!("expected a validation error");
        };
        assert!(fields.contains_key("distance"));
        assert!(fields.contains_key(NON_FIELD_ERRORS));
    }

    #[test]
    fn label_joins_id_and_airports() {
        assert_eq!(route_label(4, "Boryspil", "Heathrow"), "4. Boryspil - Heathrow");
    }
}
