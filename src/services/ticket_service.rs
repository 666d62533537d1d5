use crate::models::airplane::SeatLayout;
use crate::models::ticket::{Ticket, TicketPatch, TicketRequest, SEAT_TAKEN_MESSAGE};
use crate::models::Resource;
use crate::services::order_service::OrderService;
use crate::utils::error::{constraint_violation, AppError, AppResult, ConstraintViolation};
use crate::utils::validation::validate_seat_and_row;
use sqlx::{MySqlConnection, MySqlPool};

pub(crate) const SELECT_TICKET: &str =
    "SELECT id, seat, `row`, flight_id AS flight, order_id AS `order` FROM tickets";

fn map_write_error(err: sqlx::Error, request: &TicketRequest) -> AppError {
    match constraint_violation(&err) {
        // the only guard against two buyers racing for one seat
        Some(ConstraintViolation::Unique) => AppError::non_field(SEAT_TAKEN_MESSAGE),
        Some(ConstraintViolation::ForeignKey(_)) => {
            Resource::Flight.missing_reference("flight", request.flight)
        }
        _ => err.into(),
    }
}

/// Seat grid of the airplane flying `flight_id`; `None` if no airplane is
/// assigned. An unknown flight is a field error on `flight`.
pub(crate) async fn flight_layout(
    conn: &mut MySqlConnection,
    flight_id: i32,
) -> AppResult<Option<SeatLayout>> {
    let row = sqlx::query_as::<_, (Option<i32>, Option<i32>)>(
        r#"
        SELECT a.`rows`, a.seats_in_row
        FROM flights f
        LEFT JOIN airplanes a ON a.id = f.airplane_id
        WHERE f.id = ?
        "#,
    )
    .bind(flight_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| Resource::Flight.missing_reference("flight", flight_id))?;

    Ok(match row {
        (Some(rows), Some(seats_in_row)) => Some(SeatLayout { rows, seats_in_row }),
        _ => None,
    })
}

/// Validates the seat against the flight's airplane and inserts the ticket
/// into `order_id`
pub(crate) async fn insert_ticket(
    conn: &mut MySqlConnection,
    order_id: i32,
    request: &TicketRequest,
) -> AppResult<Ticket> {
    let layout = flight_layout(&mut *conn, request.flight).await?;
    validate_seat_and_row(request.row, request.seat, layout)?;

    let result = sqlx::query("INSERT INTO tickets (`row`, seat, flight_id, order_id) VALUES (?, ?, ?, ?)")
        .bind(request.row)
        .bind(request.seat)
        .bind(request.flight)
        .bind(order_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| map_write_error(e, request))?;

    Ok(Ticket {
        id: result.last_insert_id() as i32,
        seat: request.seat,
        row_number: request.row,
        flight: request.flight,
        order: order_id,
    })
}

/// Tickets nested under an order. Every operation first resolves the order
/// against the caller.
#[derive(Clone)]
pub struct TicketService {
    pool: MySqlPool,
    order_service: OrderService,
}

impl TicketService {
    pub fn new(pool: MySqlPool) -> Self {
        TicketService {
            order_service: OrderService::new(pool.clone()),
            pool,
        }
    }

    pub async fn list_tickets(&self, user_id: i32, order_id: i32) -> AppResult<Vec<Ticket>> {
        self.order_service.find_owned_order(user_id, order_id).await?;

        let tickets = sqlx::query_as::<_, Ticket>(&format!("{} WHERE order_id = ? ORDER BY id", SELECT_TICKET))
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(tickets)
    }

    async fn find_ticket(&self, order_id: i32, ticket_id: i32) -> AppResult<Ticket> {
        sqlx::query_as::<_, Ticket>(&format!("{} WHERE id = ? AND order_id = ?", SELECT_TICKET))
            .bind(ticket_id)
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Resource::Ticket.not_found())
    }

    pub async fn get_ticket(&self, user_id: i32, order_id: i32, ticket_id: i32) -> AppResult<Ticket> {
        self.order_service.find_owned_order(user_id, order_id).await?;
        self.find_ticket(order_id, ticket_id).await
    }

    pub async fn create_ticket(
        &self,
        user_id: i32,
        order_id: i32,
        request: TicketRequest,
    ) -> AppResult<Ticket> {
        self.order_service.find_owned_order(user_id, order_id).await?;

        let mut conn = self.pool.acquire().await?;
        insert_ticket(&mut conn, order_id, &request).await
    }

    /// Moves the ticket to another seat or flight; it stays in its order
    pub async fn update_ticket(
        &self,
        user_id: i32,
        order_id: i32,
        ticket_id: i32,
        request: TicketRequest,
    ) -> AppResult<Ticket> {
        self.order_service.find_owned_order(user_id, order_id).await?;
        self.find_ticket(order_id, ticket_id).await?;

        let mut conn = self.pool.acquire().await?;
        let layout = flight_layout(&mut conn, request.flight).await?;
        validate_seat_and_row(request.row, request.seat, layout)?;

        sqlx::query("UPDATE tickets SET `row` = ?, seat = ?, flight_id = ? WHERE id = ? AND order_id = ?")
            .bind(request.row)
            .bind(request.seat)
            .bind(request.flight)
            .bind(ticket_id)
            .bind(order_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| map_write_error(e, &request))?;

        Ok(Ticket {
            id: ticket_id,
            seat: request.seat,
            row_number: request.row,
            flight: request.flight,
            order: order_id,
        })
    }

    /// Applies the given fields over the stored ticket, then checks the seat
    /// like a full update
    pub async fn patch_ticket(
        &self,
        user_id: i32,
        order_id: i32,
        ticket_id: i32,
        patch: TicketPatch,
    ) -> AppResult<Ticket> {
        self.order_service.find_owned_order(user_id, order_id).await?;
        let current = self.find_ticket(order_id, ticket_id).await?;

        self.update_ticket(user_id, order_id, ticket_id, patch.merge(current))
            .await
    }

    pub async fn delete_ticket(&self, user_id: i32, order_id: i32, ticket_id: i32) -> AppResult<()> {
        self.order_service.find_owned_order(user_id, order_id).await?;

        let result = sqlx::query("DELETE FROM tickets WHERE id = ? AND order_id = ?")
            .bind(ticket_id)
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Resource::Ticket.not_found());
        }
        Ok(())
    }
}
