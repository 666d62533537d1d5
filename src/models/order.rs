use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::ticket::{Ticket, TicketRequest};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i32,
    pub created_at: NaiveDateTime,
    pub user: i32,
}

impl OrderRow {
    pub fn with_tickets(self, tickets: Vec<Ticket>) -> Order {
        Order {
            id: self.id,
            created_at: self.created_at,
            user: self.user,
            tickets,
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Order {
    pub id: i32,
    pub created_at: NaiveDateTime,
    pub user: i32,
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct OrderCreateRequest {
    #[serde(default)]
    pub tickets: Vec<TicketRequest>,
}
