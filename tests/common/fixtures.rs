#![allow(dead_code)]

use super::test_utils::unique_name;
use airport_service::config::AppConfig;
use airport_service::models::airplane::AirplaneRequest;
use airport_service::models::airplane_type::AirplaneTypeRequest;
use airport_service::models::airport::AirportRequest;
use airport_service::models::city::CityRequest;
use airport_service::models::country::CountryRequest;
use airport_service::models::flight::FlightRequest;
use airport_service::models::route::RouteRequest;
use airport_service::models::user::UserRegistrationRequest;
use airport_service::services::airplane_service::AirplaneService;
use airport_service::services::airplane_type_service::AirplaneTypeService;
use airport_service::services::airport_service::AirportService;
use airport_service::services::city_service::CityService;
use airport_service::services::country_service::CountryService;
use airport_service::services::flight_service::FlightService;
use airport_service::services::route_service::RouteService;
use airport_service::services::user_service::UserService;
use airport_service::utils::error::AppError;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::mysql::MySqlPool as Pool;

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "mysql://unused@127.0.0.1:3306/unused".to_string(),
        jwt_secret: "test-secret".to_string(),
        token_ttl_hours: 1,
        media_root: std::env::temp_dir().join("airport_service_media"),
        max_connections: 5,
        admin_email: None,
    }
}

pub fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 12, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

pub async fn create_user(pool: &Pool) -> Result<i32, AppError> {
    UserService::new(pool.clone(), &test_config())
        .register_user(UserRegistrationRequest {
            email: format!("{}@example.com", unique_name("user")),
            password: "secret123".to_string(),
        })
        .await
}

/// Two airports in a fresh country and city, returned as (id, name) pairs
pub async fn create_airports(pool: &Pool) -> Result<((i32, String), (i32, String)), AppError> {
    let country = CountryService::new(pool.clone())
        .create_country(CountryRequest {
            name: unique_name("Country"),
        })
        .await?;
    let city = CityService::new(pool.clone())
        .create_city(CityRequest {
            name: unique_name("City"),
            country: country.id,
        })
        .await?;

    let airports = AirportService::new(pool.clone());
    let source = airports
        .create_airport(AirportRequest {
            name: unique_name("Src"),
            closest_big_city: city.id,
        })
        .await?;
    let destination = airports
        .create_airport(AirportRequest {
            name: unique_name("Dst"),
            closest_big_city: city.id,
        })
        .await?;

    Ok(((source.id, source.name), (destination.id, destination.name)))
}

pub async fn create_route(pool: &Pool) -> Result<i32, AppError> {
    let ((source, _), (destination, _)) = create_airports(pool).await?;
    let route = RouteService::new(pool.clone())
        .create_route(RouteRequest {
            source,
            destination,
            distance: 850,
        })
        .await?;
    Ok(route.id)
}

pub async fn create_airplane(pool: &Pool, rows: i32, seats_in_row: i32) -> Result<i32, AppError> {
    let airplane_type = AirplaneTypeService::new(pool.clone())
        .create_airplane_type(AirplaneTypeRequest {
            name: unique_name("Type"),
        })
        .await?;
    let airplane = AirplaneService::new(pool.clone())
        .create_airplane(AirplaneRequest {
            name: unique_name("Plane"),
            rows,
            seats_in_row,
            airplane_type: airplane_type.id,
        })
        .await?;
    Ok(airplane.id)
}

/// A flight on a new route flown by a new `rows` x `seats_in_row` airplane
pub async fn create_flight(pool: &Pool, rows: i32, seats_in_row: i32) -> Result<i32, AppError> {
    let route = create_route(pool).await?;
    let airplane = create_airplane(pool, rows, seats_in_row).await?;
    let flight = FlightService::new(pool.clone())
        .create_flight(FlightRequest {
            route,
            crews: vec![],
            airplane: Some(airplane),
            departure_time: at(8, 10),
            arrival_time: at(8, 14),
        })
        .await?;
    Ok(flight.id)
}
