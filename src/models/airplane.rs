use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Seating grid of an airplane; rows and seats are numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatLayout {
    pub rows: i32,
    pub seats_in_row: i32,
}

impl SeatLayout {
    pub fn capacity(&self) -> i64 {
        i64::from(self.rows) * i64::from(self.seats_in_row)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Airplane {
    pub id: i32,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
    pub image: Option<String>,
    pub airplane_type: i32,
}

impl Airplane {
    pub fn layout(&self) -> SeatLayout {
        SeatLayout {
            rows: self.rows,
            seats_in_row: self.seats_in_row,
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct AirplaneDetail {
    pub id: i32,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
    pub image: Option<String>,
    pub capacity: i64,
    pub airplane_type: i32,
}

impl From<Airplane> for AirplaneDetail {
    fn from(airplane: Airplane) -> Self {
        AirplaneDetail {
            capacity: airplane.layout().capacity(),
            id: airplane.id,
            name: airplane.name,
            rows: airplane.rows,
            seats_in_row: airplane.seats_in_row,
            image: airplane.image,
            airplane_type: airplane.airplane_type,
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct AirplaneRequest {
    #[validate(length(min = 1, max = 25, message = "Name must be 1 to 25 characters long."))]
    pub name: String,
    #[validate(range(min = 1, message = "Rows must be a positive number."))]
    pub rows: i32,
    #[validate(range(min = 1, message = "Seats in row must be a positive number."))]
    pub seats_in_row: i32,
    pub airplane_type: i32,
}

/// Partial airplane update; the image is only set through the upload
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct AirplanePatch {
    pub name: Option<String>,
    pub rows: Option<i32>,
    pub seats_in_row: Option<i32>,
    pub airplane_type: Option<i32>,
}

impl AirplanePatch {
    pub fn merge(self, current: Airplane) -> AirplaneRequest {
        AirplaneRequest {
            name: self.name.unwrap_or(current.name),
            rows: self.rows.unwrap_or(current.rows),
            seats_in_row: self.seats_in_row.unwrap_or(current.seats_in_row),
            airplane_type: self.airplane_type.unwrap_or(current.airplane_type),
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct AirplaneImage {
    pub id: i32,
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_is_rows_times_seats() {
        let airplane = Airplane {
            id: 1,
            name: "Boeing".into(),
            rows: 20,
            seats_in_row: 5,
            image: None,
            airplane_type: 1,
        };
        assert_eq!(AirplaneDetail::from(airplane).capacity, 100);
    }
}
