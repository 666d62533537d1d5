use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::body::REQUIRED_MESSAGE;
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Airport {
    pub id: i32,
    pub name: String,
    pub closest_big_city: Option<i32>,
}

#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct AirportDetail {
    pub id: i32,
    pub name: String,
    pub closest_big_city: Option<String>,
}

/// The storage allows an airport without a city; the API always asks for one
#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct AirportRequest {
    #[validate(length(min = 1, max = 25, message = "Name must be 1 to 25 characters long."))]
    pub name: String,
    pub closest_big_city: i32,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct AirportPatch {
    pub name: Option<String>,
    pub closest_big_city: Option<i32>,
}

impl AirportPatch {
    /// An airport whose city was deleted needs one in the patch
    pub fn merge(self, current: Airport) -> AppResult<AirportRequest> {
        let closest_big_city = self
            .closest_big_city
            .or(current.closest_big_city)
            .ok_or_else(|| AppError::field("closest_big_city", REQUIRED_MESSAGE))?;
        Ok(AirportRequest {
            name: self.name.unwrap_or(current.name),
            closest_big_city,
        })
    }
}
