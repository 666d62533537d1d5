pub mod airplane;
pub mod airplane_type;
pub mod airport;
pub mod city;
pub mod country;
pub mod crew;
pub mod flight;
pub mod order;
pub mod route;
pub mod ticket;
pub mod user;

use strum_macros::Display;

use crate::utils::error::AppError;

/// Resource names as they appear in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Resource {
    Country,
    City,
    Airport,
    Route,
    #[strum(serialize = "Airplane type")]
    AirplaneType,
    Airplane,
    Crew,
    Flight,
    Order,
    Ticket,
    User,
}

impl Resource {
    pub fn not_found(self) -> AppError {
        AppError::NotFound(format!("{} not found", self))
    }

    /// Field error for a write that references a missing related row
    pub fn missing_reference(self, field: &str, id: i32) -> AppError {
        AppError::field(
            field,
            format!("Invalid pk \"{}\" - {} does not exist.", id, self.to_string().to_lowercase()),
        )
    }
}
