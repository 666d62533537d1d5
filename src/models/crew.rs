use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Crew {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

impl Crew {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CrewDetail {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
}

impl From<Crew> for CrewDetail {
    fn from(crew: Crew) -> Self {
        CrewDetail {
            full_name: crew.full_name(),
            id: crew.id,
            first_name: crew.first_name,
            last_name: crew.last_name,
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct CrewRequest {
    #[validate(length(min = 1, max = 35, message = "First name must be 1 to 35 characters long."))]
    pub first_name: String,
    #[validate(length(min = 1, max = 35, message = "Last name must be 1 to 35 characters long."))]
    pub last_name: String,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CrewPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl CrewPatch {
    pub fn merge(self, current: CrewDetail) -> CrewRequest {
        CrewRequest {
            first_name: self.first_name.unwrap_or(current.first_name),
            last_name: self.last_name.unwrap_or(current.last_name),
        }
    }
}

/// One entry of a crew member's flight list
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct FlightShortList {
    pub flight: String,
}
