use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Ticket {
    pub id: i32,
    pub seat: i32,
    #[sqlx(rename = "row")]
    #[serde(rename = "row")]
    pub row_number: i32,
    pub flight: i32,
    pub order: i32,
}

/// A seat to book. The owning order always comes from the URL or the order
/// being created; an `order` key in the body is ignored.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TicketRequest {
    pub row: i32,
    pub seat: i32,
    pub flight: i32,
}

/// Partial ticket update; absent fields keep their stored value
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct TicketPatch {
    pub row: Option<i32>,
    pub seat: Option<i32>,
    pub flight: Option<i32>,
}

impl TicketPatch {
    pub fn merge(self, current: Ticket) -> TicketRequest {
        TicketRequest {
            row: self.row.unwrap_or(current.row_number),
            seat: self.seat.unwrap_or(current.seat),
            flight: self.flight.unwrap_or(current.flight),
        }
    }
}

/// Message used when (row, seat, flight) is already taken
pub const SEAT_TAKEN_MESSAGE: &str = "The fields row, seat, flight must make a unique set.";
