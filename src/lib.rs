#[macro_use]
extern crate rocket;

pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use log::{error, info};
use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};
use rocket_okapi::openapi_get_routes;
use rocket_okapi::swagger_ui::{make_swagger_ui, SwaggerUIConfig};
use sqlx::MySqlPool;

use crate::config::AppConfig;
use crate::services::airplane_service::AirplaneService;
use crate::services::airplane_type_service::AirplaneTypeService;
use crate::services::airport_service::AirportService;
use crate::services::city_service::CityService;
use crate::services::country_service::CountryService;
use crate::services::crew_service::CrewService;
use crate::services::flight_service::FlightService;
use crate::services::order_service::OrderService;
use crate::services::route_service::RouteService;
use crate::services::ticket_service::TicketService;
use crate::services::user_service::UserService;

// Swagger UI under /swagger reads the document generated for /api
fn swagger_ui() -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: "/api/openapi.json".to_string(),
        ..Default::default()
    }
}

/// Assembles the application around an existing pool. Tests pass a lazily
/// connected pool so requests rejected by guards never touch MySQL.
pub fn build_rocket(config: AppConfig, pool: MySqlPool) -> Rocket<Build> {
    rocket::build()
        .manage(UserService::new(pool.clone(), &config))
        .manage(CountryService::new(pool.clone()))
        .manage(CityService::new(pool.clone()))
        .manage(AirportService::new(pool.clone()))
        .manage(RouteService::new(pool.clone()))
        .manage(AirplaneTypeService::new(pool.clone()))
        .manage(AirplaneService::new(pool.clone()))
        .manage(CrewService::new(pool.clone()))
        .manage(FlightService::new(pool.clone()))
        .manage(OrderService::new(pool.clone()))
        .manage(TicketService::new(pool))
        .manage(config)
        .mount(
            "/api",
            openapi_get_routes![
                routes::user_route::register,
                routes::user_route::token,
                routes::country_route::list_countries,
                routes::country_route::get_country,
                routes::country_route::create_country,
                routes::country_route::update_country,
                routes::country_route::patch_country,
                routes::country_route::delete_country,
                routes::city_route::list_cities,
                routes::city_route::get_city,
                routes::city_route::create_city,
                routes::city_route::update_city,
                routes::city_route::patch_city,
                routes::city_route::delete_city,
                routes::airport_route::list_airports,
                routes::airport_route::get_airport,
                routes::airport_route::create_airport,
                routes::airport_route::update_airport,
                routes::airport_route::patch_airport,
                routes::airport_route::delete_airport,
                routes::route_route::list_routes,
                routes::route_route::get_route,
                routes::route_route::create_route,
                routes::route_route::update_route,
                routes::route_route::patch_route,
                routes::route_route::delete_route,
                routes::airplane_type_route::list_airplane_types,
                routes::airplane_type_route::get_airplane_type,
                routes::airplane_type_route::create_airplane_type,
                routes::airplane_type_route::update_airplane_type,
                routes::airplane_type_route::patch_airplane_type,
                routes::airplane_type_route::delete_airplane_type,
                routes::airplane_route::list_airplanes,
                routes::airplane_route::get_airplane,
                routes::airplane_route::create_airplane,
                routes::airplane_route::update_airplane,
                routes::airplane_route::patch_airplane,
                routes::airplane_route::delete_airplane,
                routes::airplane_route::upload_image,
                routes::crew_route::list_crews,
                routes::crew_route::get_crew,
                routes::crew_route::create_crew,
                routes::crew_route::update_crew,
                routes::crew_route::patch_crew,
                routes::crew_route::delete_crew,
                routes::crew_route::list_crew_flights,
                routes::flight_route::list_flights,
                routes::flight_route::get_flight,
                routes::flight_route::create_flight,
                routes::flight_route::update_flight,
                routes::flight_route::patch_flight,
                routes::flight_route::delete_flight,
                routes::order_route::list_orders,
                routes::order_route::create_order,
                routes::order_route::get_order,
                routes::ticket_route::list_tickets,
                routes::ticket_route::get_ticket,
                routes::ticket_route::create_ticket,
                routes::ticket_route::update_ticket,
                routes::ticket_route::patch_ticket,
                routes::ticket_route::delete_ticket,
            ],
        )
        // read-only resources answer writes with 405 once the caller is known
        .mount(
            "/api",
            routes![
                routes::crew_route::create_crew_flight,
                routes::crew_route::update_crew_flights,
                routes::crew_route::patch_crew_flights,
                routes::crew_route::delete_crew_flights,
                routes::flight_route::create_flight_not_allowed,
                routes::flight_route::replace_flights_not_allowed,
                routes::flight_route::patch_flights_not_allowed,
                routes::flight_route::delete_flights_not_allowed,
                routes::flight_route::post_flight_not_allowed,
                routes::flight_route::update_flight_not_allowed,
                routes::flight_route::patch_flight_not_allowed,
                routes::flight_route::delete_flight_not_allowed,
                routes::order_route::replace_orders,
                routes::order_route::patch_orders,
                routes::order_route::delete_orders,
                routes::order_route::post_order,
                routes::order_route::update_order,
                routes::order_route::patch_order,
                routes::order_route::delete_order,
            ],
        )
        .mount("/swagger", make_swagger_ui(&swagger_ui()))
        .register("/", catchers![routes::catchers::json_catcher])
        // ADMIN_EMAIL is the only way to grant staff rights
        .attach(AdHoc::try_on_ignite("Staff bootstrap", |rocket| {
            Box::pin(async move {
                let email = rocket
                    .state::<AppConfig>()
                    .and_then(|config| config.admin_email.clone());
                let (Some(email), Some(users)) = (email, rocket.state::<UserService>()) else {
                    return Ok(rocket);
                };
                let result = users.promote_to_staff(&email).await;
                match result {
                    Ok(_) => Ok(rocket),
                    Err(e) => {
                        error!("Granting staff rights to {} failed: {}", email, e);
                        Err(rocket)
                    }
                }
            })
        }))
        .attach(AdHoc::on_liftoff("Startup", |rocket| {
            Box::pin(async move {
                if let Some(config) = rocket.state::<AppConfig>() {
                    info!(
                        "Serving /api with media root {} and {}h tokens",
                        config.media_root.display(),
                        config.token_ttl_hours
                    );
                }
            })
        }))
        .attach(AdHoc::on_response("CORS", |_, res| {
            Box::pin(async move {
                res.set_header(rocket::http::Header::new(
                    "Access-Control-Allow-Origin",
                    "*",
                ));
            })
        }))
}
