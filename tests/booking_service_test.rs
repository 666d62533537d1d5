use airport_service::{
    models::{
        crew::CrewRequest,
        flight::{FlightFilter, FlightListItem, FlightPatch, FlightRequest},
        order::OrderCreateRequest,
        route::RouteRequest,
        ticket::{Ticket, TicketPatch, TicketRequest, SEAT_TAKEN_MESSAGE},
    },
    services::{
        crew_service::CrewService, flight_service::FlightService, order_service::OrderService,
        route_service::RouteService, ticket_service::TicketService,
    },
    utils::error::{AppError, NON_FIELD_ERRORS},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use serde_json::json;
use sqlx::mysql::MySqlPool as Pool;
use test_context::{test_context, AsyncTestContext};
use tokio::task::JoinSet;

#[macro_use]
mod common {
    #[macro_use]
    pub mod test_utils;
    pub mod fixtures;
}
use common::fixtures::{at, create_airplane, create_airports, create_flight, create_route, create_user};
use common::test_utils::TestDb;
use ctor::dtor;

struct BookingContext {
    pool: Option<Pool>,
}

#[dtor]
fn cleanup() {
    if let Err(e) = TestDb::cleanup_database_sync() {
        eprintln!("Failed to cleanup test database: {}", e);
    }
}

#[async_trait]
impl AsyncTestContext for BookingContext {
    async fn setup() -> Self {
        let pool = TestDb::get_instance()
            .await
            .expect("Failed to get test database instance");
        BookingContext { pool }
    }

    async fn teardown(self) {
        if let Some(pool) = self.pool {
            pool.close().await;
        }
    }
}

fn ticket(flight: i32, row: i32, seat: i32) -> TicketRequest {
    TicketRequest { row, seat, flight }
}

async fn count(pool: &Pool, sql: &str, id: i32) -> Result<i64, AppError> {
    let (n,): (i64,) = sqlx::query_as(sql).bind(id).fetch_one(pool).await?;
    Ok(n)
}

async fn listed(flights: &FlightService, id: i32) -> Result<FlightListItem, AppError> {
    let all = flights.list_flights(FlightFilter::default()).await?;
    Ok(all.into_iter().find(|f| f.id == id).expect("flight listed"))
}

#[test_context(BookingContext)]
#[tokio::test]
async fn test_available_tickets_follow_sales(ctx: &BookingContext) -> Result<(), AppError> {
    let pool = require_db!(ctx);
    let flight_id = create_flight(&pool, 10, 10).await?;
    let user_id = create_user(&pool).await?;
    let flights = FlightService::new(pool.clone());

    let before = listed(&flights, flight_id).await?;
    assert_eq!(before.available_tickets, Some(100));

    OrderService::new(pool)
        .create_order(
            user_id,
            OrderCreateRequest {
                tickets: vec![ticket(flight_id, 1, 1), ticket(flight_id, 1, 2), ticket(flight_id, 2, 1)],
            },
        )
        .await?;

    let after = listed(&flights, flight_id).await?;
    assert_eq!(after.available_tickets, Some(97));

    let detail = flights.get_flight(flight_id).await?;
    assert!(detail.route.contains(" - "));
    Ok(())
}

#[test_context(BookingContext)]
#[tokio::test]
async fn test_flight_without_airplane(ctx: &BookingContext) -> Result<(), AppError> {
    let pool = require_db!(ctx);
    let route = create_route(&pool).await?;
    let flights = FlightService::new(pool.clone());

    let flight = flights
        .create_flight(FlightRequest {
            route,
            crews: vec![],
            airplane: None,
            departure_time: at(9, 6),
            arrival_time: at(9, 8),
        })
        .await?;

    let item = listed(&flights, flight.id).await?;
    assert_eq!(item.airplane, None);
    assert_eq!(item.available_tickets, None);

    // no airplane, no seat can be validated
    let user_id = create_user(&pool).await?;
    let err = OrderService::new(pool)
        .create_order(
            user_id,
            OrderCreateRequest {
                tickets: vec![ticket(flight.id, 1, 1)],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
    Ok(())
}

#[test_context(BookingContext)]
#[tokio::test]
async fn test_flight_time_order_and_uniqueness(ctx: &BookingContext) -> Result<(), AppError> {
    let pool = require_db!(ctx);
    let route = create_route(&pool).await?;
    let airplane = create_airplane(&pool, 5, 4).await?;
    let flights = FlightService::new(pool);

    let backwards = flights
        .create_flight(FlightRequest {
            route,
            crews: vec![],
            airplane: Some(airplane),
            departure_time: at(10, 12),
            arrival_time: at(10, 12),
        })
        .await
        .unwrap_err();
    let AppError::ValidationError(fields) = backwards else {
        panic!("expected a validation error");
    };
    assert!(fields.contains_key(NON_FIELD_ERRORS));

    let request = FlightRequest {
        route,
        crews: vec![],
        airplane: Some(airplane),
        departure_time: at(10, 12),
        arrival_time: at(10, 15),
    };
    flights.create_flight(request.clone()).await?;
    let duplicate = flights.create_flight(request).await.unwrap_err();
    assert!(matches!(duplicate, AppError::ValidationError(_)));
    Ok(())
}

#[test_context(BookingContext)]
#[tokio::test]
async fn test_flight_filters_and_crew_listing(ctx: &BookingContext) -> Result<(), AppError> {
    let pool = require_db!(ctx);
    let ((source, source_name), (destination, destination_name)) = create_airports(&pool).await?;
    let route = RouteService::new(pool.clone())
        .create_route(RouteRequest {
            source,
            destination,
            distance: 400,
        })
        .await?;
    let crews = CrewService::new(pool.clone());
    let pilot = crews
        .create_crew(CrewRequest {
            first_name: "Chuck".to_string(),
            last_name: "Yeager".to_string(),
        })
        .await?;

    let flights = FlightService::new(pool);
    let early = flights
        .create_flight(FlightRequest {
            route: route.id,
            crews: vec![pilot.id, pilot.id],
            airplane: None,
            departure_time: at(3, 22),
            arrival_time: at(4, 2),
        })
        .await?;
    assert_eq!(early.crews, vec![pilot.id]);
    flights
        .create_flight(FlightRequest {
            route: route.id,
            crews: vec![],
            airplane: None,
            departure_time: at(20, 9),
            arrival_time: at(20, 11),
        })
        .await?;

    let by_source = flights
        .list_flights(FlightFilter {
            source: Some(source_name.to_uppercase()),
            ..Default::default()
        })
        .await?;
    assert_eq!(by_source.len(), 2);

    // departure on the 3rd, arrival on the 4th; bounds are inclusive
    let by_dates = flights
        .list_flights(FlightFilter {
            destination: Some(destination_name),
            start_departure_date: NaiveDate::from_ymd_opt(2024, 12, 3),
            end_departure_date: NaiveDate::from_ymd_opt(2024, 12, 3),
            end_arrival_date: NaiveDate::from_ymd_opt(2024, 12, 4),
            ..Default::default()
        })
        .await?;
    assert_eq!(by_dates.len(), 1);
    assert_eq!(by_dates[0].id, early.id);
    assert_eq!(by_dates[0].crews, vec!["Chuck Yeager".to_string()]);

    let crew_flights = crews.list_crew_flights(pilot.id).await?;
    assert_eq!(crew_flights.len(), 1);
    assert!(crew_flights[0].flight.starts_with(&format!("{}. ", route.id)));
    Ok(())
}

#[test_context(BookingContext)]
#[tokio::test]
async fn test_order_is_all_or_nothing(ctx: &BookingContext) -> Result<(), AppError> {
    let pool = require_db!(ctx);
    let flight_id = create_flight(&pool, 4, 4).await?;
    let user_id = create_user(&pool).await?;
    let orders = OrderService::new(pool.clone());

    // the same seat twice in one request
    let err = orders
        .create_order(
            user_id,
            OrderCreateRequest {
                tickets: vec![ticket(flight_id, 2, 2), ticket(flight_id, 2, 2)],
            },
        )
        .await
        .unwrap_err();
    let AppError::ValidationError(fields) = err else {
        panic!("expected a validation error");
    };
    assert_eq!(fields[NON_FIELD_ERRORS], vec![SEAT_TAKEN_MESSAGE.to_string()]);

    // a seat outside the airplane after a valid one
    let err = orders
        .create_order(
            user_id,
            OrderCreateRequest {
                tickets: vec![ticket(flight_id, 1, 1), ticket(flight_id, 5, 1)],
            },
        )
        .await
        .unwrap_err();
    let AppError::ValidationError(fields) = err else {
        panic!("expected a validation error");
    };
    assert_eq!(fields["row"], vec!["Row must be in available range: (1, 4)".to_string()]);

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM orders WHERE user_id = ?", user_id).await?, 0);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM tickets WHERE flight_id = ?", flight_id).await?, 0);

    let order = orders
        .create_order(
            user_id,
            OrderCreateRequest {
                tickets: vec![ticket(flight_id, 1, 1), ticket(flight_id, 4, 4)],
            },
        )
        .await?;
    assert_eq!(order.user, user_id);
    assert_eq!(order.tickets.len(), 2);
    assert!(order.tickets.iter().all(|t| t.order == order.id));
    Ok(())
}

#[test_context(BookingContext)]
#[tokio::test]
async fn test_orders_are_owner_scoped(ctx: &BookingContext) -> Result<(), AppError> {
    let pool = require_db!(ctx);
    let flight_id = create_flight(&pool, 3, 3).await?;
    let owner = create_user(&pool).await?;
    let stranger = create_user(&pool).await?;
    let orders = OrderService::new(pool.clone());
    let tickets = TicketService::new(pool);

    let order = orders
        .create_order(
            owner,
            OrderCreateRequest {
                tickets: vec![ticket(flight_id, 1, 1)],
            },
        )
        .await?;
    let first = order.tickets[0].clone();

    assert_eq!(orders.list_orders(owner).await?.len(), 1);
    assert!(orders.list_orders(stranger).await?.is_empty());
    assert!(matches!(orders.get_order(stranger, order.id).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        tickets.list_tickets(stranger, order.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        tickets.delete_ticket(stranger, order.id, first.id).await,
        Err(AppError::NotFound(_))
    ));

    // nested ticket CRUD for the owner
    let added = tickets.create_ticket(owner, order.id, ticket(flight_id, 3, 3)).await?;
    assert_eq!(added.order, order.id);

    let moved = tickets
        .update_ticket(owner, order.id, added.id, ticket(flight_id, 2, 2))
        .await?;
    assert_eq!((moved.row_number, moved.seat), (2, 2));

    let taken = tickets
        .update_ticket(owner, order.id, added.id, ticket(flight_id, 1, 1))
        .await
        .unwrap_err();
    assert!(matches!(taken, AppError::ValidationError(_)));

    tickets.delete_ticket(owner, order.id, added.id).await?;
    assert_eq!(tickets.list_tickets(owner, order.id).await?, vec![first]);
    Ok(())
}

#[test_context(BookingContext)]
#[tokio::test]
async fn test_concurrent_orders_for_one_seat(ctx: &BookingContext) -> Result<(), AppError> {
    let pool = require_db!(ctx);
    let flight_id = create_flight(&pool, 2, 2).await?;
    let num_users = 8;

    let mut user_ids = Vec::new();
    for _ in 0..num_users {
        user_ids.push(create_user(&pool).await?);
    }
    user_ids.shuffle(&mut rand::thread_rng());

    let orders = OrderService::new(pool.clone());
    let mut join_set = JoinSet::new();
    for user_id in user_ids {
        let orders = orders.clone();
        join_set.spawn(async move {
            let request = OrderCreateRequest {
                tickets: vec![ticket(flight_id, 1, 2)],
            };
            (user_id, orders.create_order(user_id, request).await)
        });
    }

    let mut successful_orders = 0;
    while let Some(result) = join_set.join_next().await {
        match result.expect("booking task panicked") {
            (_, Ok(_)) => successful_orders += 1,
            (user_id, Err(e)) => println!("User {} failed to book: {}", user_id, e),
        }
    }

    assert_eq!(successful_orders, 1, "Only one order may win the seat");
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM tickets WHERE flight_id = ?", flight_id).await?, 1);
    Ok(())
}

#[test_context(BookingContext)]
#[tokio::test]
async fn test_tickets_stay_in_the_order_they_are_filed_under(ctx: &BookingContext) -> Result<(), AppError> {
    let pool = require_db!(ctx);
    let flight_id = create_flight(&pool, 4, 4).await?;
    let owner = create_user(&pool).await?;
    let orders = OrderService::new(pool.clone());
    let tickets = TicketService::new(pool.clone());

    let target = orders.create_order(owner, OrderCreateRequest::default()).await?;
    let other = orders.create_order(owner, OrderCreateRequest::default()).await?;

    // a client-supplied order id in the body has no effect
    let request: TicketRequest = serde_json::from_value(json!({
        "row": 2, "seat": 3, "flight": flight_id, "order": other.id
    }))
    .expect("ticket body");
    let created = tickets.create_ticket(owner, target.id, request).await?;
    assert_eq!(created.order, target.id);

    let request: TicketRequest = serde_json::from_value(json!({
        "row": 4, "seat": 4, "flight": flight_id, "order": other.id
    }))
    .expect("ticket body");
    let updated = tickets.update_ticket(owner, target.id, created.id, request).await?;
    assert_eq!(updated.order, target.id);

    let stored = sqlx::query_as::<_, Ticket>(
        "SELECT id, seat, `row`, flight_id AS flight, order_id AS `order` FROM tickets WHERE order_id = ?",
    )
    .bind(target.id)
    .fetch_all(&pool)
    .await?;
    assert_eq!(stored, vec![updated]);
    assert_eq!(stored[0].row_number, 4);
    assert!(tickets.list_tickets(owner, other.id).await?.is_empty());
    Ok(())
}

#[test_context(BookingContext)]
#[tokio::test]
async fn test_ticket_partial_update(ctx: &BookingContext) -> Result<(), AppError> {
    let pool = require_db!(ctx);
    let flight_id = create_flight(&pool, 3, 3).await?;
    let owner = create_user(&pool).await?;
    let stranger = create_user(&pool).await?;
    let orders = OrderService::new(pool.clone());
    let tickets = TicketService::new(pool);

    let order = orders
        .create_order(
            owner,
            OrderCreateRequest {
                tickets: vec![ticket(flight_id, 1, 1), ticket(flight_id, 2, 2)],
            },
        )
        .await?;
    let first = order.tickets[0].clone();

    let patched = tickets
        .patch_ticket(
            owner,
            order.id,
            first.id,
            TicketPatch {
                seat: Some(3),
                ..TicketPatch::default()
            },
        )
        .await?;
    assert_eq!((patched.row_number, patched.seat, patched.flight), (1, 3, flight_id));

    let out_of_range = tickets
        .patch_ticket(
            owner,
            order.id,
            first.id,
            TicketPatch {
                row: Some(4),
                ..TicketPatch::default()
            },
        )
        .await
        .unwrap_err();
    let AppError::ValidationError(fields) = out_of_range else {
        panic!("expected a validation error");
    };
    assert!(fields.contains_key("row"));

    let taken = tickets
        .patch_ticket(
            owner,
            order.id,
            first.id,
            TicketPatch {
                row: Some(2),
                seat: Some(2),
                ..TicketPatch::default()
            },
        )
        .await
        .unwrap_err();
    let AppError::ValidationError(fields) = taken else {
        panic!("expected a validation error");
    };
    assert_eq!(fields[NON_FIELD_ERRORS], vec![SEAT_TAKEN_MESSAGE.to_string()]);

    assert!(matches!(
        tickets
            .patch_ticket(stranger, order.id, first.id, TicketPatch::default())
            .await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(tickets.get_ticket(owner, order.id, first.id).await?, patched);
    Ok(())
}

#[test_context(BookingContext)]
#[tokio::test]
async fn test_flight_partial_update(ctx: &BookingContext) -> Result<(), AppError> {
    let pool = require_db!(ctx);
    let route = create_route(&pool).await?;
    let airplane = create_airplane(&pool, 5, 4).await?;
    let crew = CrewService::new(pool.clone())
        .create_crew(CrewRequest {
            first_name: "Chuck".to_string(),
            last_name: "Yeager".to_string(),
        })
        .await?;
    let flights = FlightService::new(pool);

    let flight = flights
        .create_flight(FlightRequest {
            route,
            crews: vec![crew.id],
            airplane: Some(airplane),
            departure_time: at(20, 8),
            arrival_time: at(20, 10),
        })
        .await?;

    let delayed = flights
        .patch_flight(
            flight.id,
            FlightPatch {
                arrival_time: Some(at(20, 11)),
                ..FlightPatch::default()
            },
        )
        .await?;
    assert_eq!(delayed.crews, vec![crew.id]);
    assert_eq!(delayed.airplane, Some(airplane));
    assert_eq!(delayed.arrival_time, at(20, 11));

    let backwards = flights
        .patch_flight(
            flight.id,
            FlightPatch {
                departure_time: Some(at(20, 12)),
                ..FlightPatch::default()
            },
        )
        .await
        .unwrap_err();
    let AppError::ValidationError(fields) = backwards else {
        panic!("expected a validation error");
    };
    assert!(fields.contains_key(NON_FIELD_ERRORS));

    let grounded = flights
        .patch_flight(
            flight.id,
            FlightPatch {
                airplane: Some(None),
                ..FlightPatch::default()
            },
        )
        .await?;
    assert_eq!(grounded.airplane, None);
    assert_eq!(listed(&flights, flight.id).await?.available_tickets, None);
    Ok(())
}
