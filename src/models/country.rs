use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Country {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct CountryRequest {
    #[validate(length(min = 1, max = 25, message = "Name must be 1 to 25 characters long."))]
    pub name: String,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CountryPatch {
    pub name: Option<String>,
}

impl CountryPatch {
    pub fn merge(self, current: Country) -> CountryRequest {
        CountryRequest {
            name: self.name.unwrap_or(current.name),
        }
    }
}
