use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct AirplaneType {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct AirplaneTypeRequest {
    #[validate(length(min = 1, max = 25, message = "Name must be 1 to 25 characters long."))]
    pub name: String,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct AirplaneTypePatch {
    pub name: Option<String>,
}

impl AirplaneTypePatch {
    pub fn merge(self, current: AirplaneType) -> AirplaneTypeRequest {
        AirplaneTypeRequest {
            name: self.name.unwrap_or(current.name),
        }
    }
}
