use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

// Write projection: the country is referenced by id
#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct City {
    pub id: i32,
    pub name: String,
    pub country: i32,
}

// Read projection: the country is rendered by name
#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct CityDetail {
    pub id: i32,
    pub name: String,
    pub country: String,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct CityRequest {
    #[validate(length(min = 1, max = 25, message = "Name must be 1 to 25 characters long."))]
    pub name: String,
    pub country: i32,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CityPatch {
    pub name: Option<String>,
    pub country: Option<i32>,
}

impl CityPatch {
    pub fn merge(self, current: City) -> CityRequest {
        CityRequest {
            name: self.name.unwrap_or(current.name),
            country: self.country.unwrap_or(current.country),
        }
    }
}
