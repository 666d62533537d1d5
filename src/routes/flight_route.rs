use crate::models::flight::{Flight, FlightDetail, FlightFilter, FlightListItem, FlightPatch, FlightRequest};
use crate::services::flight_service::FlightService;
use crate::utils::body::JsonBody;
use crate::utils::error::{AppError, AppResult};
use crate::utils::jwt::{AuthenticatedUser, StaffUser};
use crate::utils::response::{Created, NoContent};
use chrono::NaiveDate;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

fn parse_date(field: &str, value: Option<String>) -> AppResult<Option<NaiveDate>> {
    match value {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::field(field, "Enter a valid date.")),
    }
}

/// List flights
///
/// Dates are `YYYY-MM-DD` and bound the departure or arrival date inclusively.
/// `source` and `destination` match airport names case-insensitively.
#[openapi(tag = "Flights")]
#[get("/flights?<start_departure_date>&<end_departure_date>&<start_arrival_date>&<end_arrival_date>&<source>&<destination>")]
#[allow(clippy::too_many_arguments)]
pub async fn list_flights(
    start_departure_date: Option<String>,
    end_departure_date: Option<String>,
    start_arrival_date: Option<String>,
    end_arrival_date: Option<String>,
    source: Option<String>,
    destination: Option<String>,
    _auth: AuthenticatedUser,
    flight_service: &State<FlightService>,
) -> Result<Json<Vec<FlightListItem>>, AppError> {
    let filter = FlightFilter {
        start_departure_date: parse_date("start_departure_date", start_departure_date)?,
        end_departure_date: parse_date("end_departure_date", end_departure_date)?,
        start_arrival_date: parse_date("start_arrival_date", start_arrival_date)?,
        end_arrival_date: parse_date("end_arrival_date", end_arrival_date)?,
        source: source.filter(|s| !s.trim().is_empty()),
        destination: destination.filter(|s| !s.trim().is_empty()),
    };
    Ok(Json(flight_service.list_flights(filter).await?))
}

/// Flight detail with route, crew names and airplane
#[openapi(tag = "Flights")]
#[get("/flights/<id>")]
pub async fn get_flight(
    id: i32,
    _auth: AuthenticatedUser,
    flight_service: &State<FlightService>,
) -> Result<Json<FlightDetail>, AppError> {
    Ok(Json(flight_service.get_flight(id).await?))
}

// The public flight resource is read-only

#[post("/flights")]
pub fn create_flight_not_allowed(_auth: AuthenticatedUser) -> AppError {
    AppError::method_not_allowed("POST")
}

#[put("/flights")]
pub fn replace_flights_not_allowed(_auth: AuthenticatedUser) -> AppError {
    AppError::method_not_allowed("PUT")
}

#[patch("/flights")]
pub fn patch_flights_not_allowed(_auth: AuthenticatedUser) -> AppError {
    AppError::method_not_allowed("PATCH")
}

#[delete("/flights")]
pub fn delete_flights_not_allowed(_auth: AuthenticatedUser) -> AppError {
    AppError::method_not_allowed("DELETE")
}

#[post("/flights/<_id>")]
pub fn post_flight_not_allowed(_id: i32, _auth: AuthenticatedUser) -> AppError {
    AppError::method_not_allowed("POST")
}

#[put("/flights/<_id>")]
pub fn update_flight_not_allowed(_id: i32, _auth: AuthenticatedUser) -> AppError {
    AppError::method_not_allowed("PUT")
}

#[patch("/flights/<_id>")]
pub fn patch_flight_not_allowed(_id: i32, _auth: AuthenticatedUser) -> AppError {
    AppError::method_not_allowed("PATCH")
}

#[delete("/flights/<_id>")]
pub fn delete_flight_not_allowed(_id: i32, _auth: AuthenticatedUser) -> AppError {
    AppError::method_not_allowed("DELETE")
}

/// Schedule a flight (staff)
#[openapi(tag = "Flight administration")]
#[post("/admin/flights", data = "<request>")]
pub async fn create_flight(
    _staff: StaffUser,
    request: JsonBody<FlightRequest>,
    flight_service: &State<FlightService>,
) -> Result<Created<Flight>, AppError> {
    Ok(Created(flight_service.create_flight(request.into_inner()).await?))
}

/// Reschedule a flight or replace its crew (staff)
#[openapi(tag = "Flight administration")]
#[put("/admin/flights/<id>", data = "<request>")]
pub async fn update_flight(
    id: i32,
    _staff: StaffUser,
    request: JsonBody<FlightRequest>,
    flight_service: &State<FlightService>,
) -> Result<Json<Flight>, AppError> {
    Ok(Json(flight_service.update_flight(id, request.into_inner()).await?))
}

/// Change some attributes of a flight (staff)
#[openapi(tag = "Flight administration")]
#[patch("/admin/flights/<id>", data = "<patch>")]
pub async fn patch_flight(
    id: i32,
    _staff: StaffUser,
    patch: JsonBody<FlightPatch>,
    flight_service: &State<FlightService>,
) -> Result<Json<Flight>, AppError> {
    Ok(Json(flight_service.patch_flight(id, patch.into_inner()).await?))
}

/// Cancel a flight; its tickets go with it (staff)
#[openapi(tag = "Flight administration")]
#[delete("/admin/flights/<id>")]
pub async fn delete_flight(
    id: i32,
    _staff: StaffUser,
    flight_service: &State<FlightService>,
) -> Result<NoContent, AppError> {
    flight_service.delete_flight(id).await?;
    Ok(NoContent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_parse_as_calendar_days() {
        assert_eq!(
            parse_date("start_departure_date", Some("2024-12-08".into())).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 8)
        );
        assert_eq!(parse_date("start_departure_date", None).unwrap(), None);
    }

    #[test]
    fn malformed_date_names_the_parameter() {
        let err = parse_date("end_arrival_date", Some("08/12/2024".into())).unwrap_err();
        let AppError::ValidationError(fields) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(fields["end_arrival_date"], vec!["Enter a valid date.".to_string()]);
    }
}
