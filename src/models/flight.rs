use chrono::{NaiveDate, NaiveDateTime};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::models::airplane::SeatLayout;
use crate::models::route::route_label;

pub const ARRIVAL_BEFORE_DEPARTURE_MESSAGE: &str = "Arrival_time should be greater than Departure_time";

/// Flight joined with its route, airplane and ticket count
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FlightRow {
    pub id: i32,
    pub route_id: i32,
    pub source_name: String,
    pub destination_name: String,
    pub airplane_name: Option<String>,
    pub airplane_rows: Option<i32>,
    pub airplane_seats_in_row: Option<i32>,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    pub tickets_issued: i64,
}

impl FlightRow {
    pub fn route_label(&self) -> String {
        route_label(self.route_id, &self.source_name, &self.destination_name)
    }

    pub fn layout(&self) -> Option<SeatLayout> {
        match (self.airplane_rows, self.airplane_seats_in_row) {
            (Some(rows), Some(seats_in_row)) => Some(SeatLayout { rows, seats_in_row }),
            _ => None,
        }
    }

    pub fn into_list_item(self, crews: Vec<String>) -> FlightListItem {
        FlightListItem {
            available_tickets: available_tickets(self.layout(), self.tickets_issued),
            route: self.route_label(),
            id: self.id,
            crews,
            airplane: self.airplane_name,
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
        }
    }

    pub fn into_detail(self, crews: Vec<String>) -> FlightDetail {
        FlightDetail {
            route: self.route_label(),
            id: self.id,
            crews,
            airplane: self.airplane_name,
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
        }
    }
}

/// Seats left on a flight. Not stored: derived from the current ticket
/// count on every read. `None` when no airplane is assigned.
pub fn available_tickets(layout: Option<SeatLayout>, tickets_issued: i64) -> Option<i64> {
    layout.map(|layout| layout.capacity() - tickets_issued)
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct FlightListItem {
    pub id: i32,
    pub route: String,
    pub crews: Vec<String>,
    pub airplane: Option<String>,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    pub available_tickets: Option<i64>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct FlightDetail {
    pub id: i32,
    pub route: String,
    pub crews: Vec<String>,
    pub airplane: Option<String>,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
}

// Write projection, related rows referenced by id
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Flight {
    pub id: i32,
    pub route: i32,
    pub crews: Vec<i32>,
    pub airplane: Option<i32>,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[validate(schema(function = "validate_flight_times", skip_on_field_errors = false))]
pub struct FlightRequest {
    pub route: i32,
    #[serde(default)]
    pub crews: Vec<i32>,
    #[serde(default)]
    pub airplane: Option<i32>,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
}

// Tells an explicit `null` apart from an absent key
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial flight update. `crews` replaces the whole crew set when given;
/// `"airplane": null` unassigns the airplane.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct FlightPatch {
    pub route: Option<i32>,
    pub crews: Option<Vec<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub airplane: Option<Option<i32>>,
    pub departure_time: Option<NaiveDateTime>,
    pub arrival_time: Option<NaiveDateTime>,
}

impl FlightPatch {
    pub fn merge(self, current: Flight) -> FlightRequest {
        FlightRequest {
            route: self.route.unwrap_or(current.route),
            crews: self.crews.unwrap_or(current.crews),
            airplane: self.airplane.unwrap_or(current.airplane),
            departure_time: self.departure_time.unwrap_or(current.departure_time),
            arrival_time: self.arrival_time.unwrap_or(current.arrival_time),
        }
    }
}

pub fn validate_flight_times(request: &FlightRequest) -> Result<(), ValidationError> {
    if request.arrival_time <= request.departure_time {
        let mut err = ValidationError::new("arrival_before_departure");
        err.message = Some(ARRIVAL_BEFORE_DEPARTURE_MESSAGE.into());
        return Err(err);
    }
    Ok(())
}

/// Flight list filters; dates compare against the date part, inclusive
#[derive(Debug, Clone, Default)]
pub struct FlightFilter {
    pub start_departure_date: Option<NaiveDate>,
    pub end_departure_date: Option<NaiveDate>,
    pub start_arrival_date: Option<NaiveDate>,
    pub end_arrival_date: Option<NaiveDate>,
    pub source: Option<String>,
    pub destination: Option<String>,
}
