use crate::models::ticket::{Ticket, TicketPatch, TicketRequest};
use crate::services::ticket_service::TicketService;
use crate::utils::body::JsonBody;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use crate::utils::response::{Created, NoContent};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

// Every handler resolves the order against the caller first; someone else's
// order is answered with 404

#[openapi(tag = "Tickets")]
#[get("/orders/<order_id>/tickets")]
pub async fn list_tickets(
    order_id: i32,
    auth: AuthenticatedUser,
    ticket_service: &State<TicketService>,
) -> Result<Json<Vec<Ticket>>, AppError> {
    Ok(Json(ticket_service.list_tickets(auth.user_id, order_id).await?))
}

#[openapi(tag = "Tickets")]
#[get("/orders/<order_id>/tickets/<id>")]
pub async fn get_ticket(
    order_id: i32,
    id: i32,
    auth: AuthenticatedUser,
    ticket_service: &State<TicketService>,
) -> Result<Json<Ticket>, AppError> {
    Ok(Json(ticket_service.get_ticket(auth.user_id, order_id, id).await?))
}

/// Add a ticket to an existing order
#[openapi(tag = "Tickets")]
#[post("/orders/<order_id>/tickets", data = "<request>")]
pub async fn create_ticket(
    order_id: i32,
    auth: AuthenticatedUser,
    request: JsonBody<TicketRequest>,
    ticket_service: &State<TicketService>,
) -> Result<Created<Ticket>, AppError> {
    let ticket = ticket_service
        .create_ticket(auth.user_id, order_id, request.into_inner())
        .await?;
    Ok(Created(ticket))
}

/// Move a ticket to another seat or flight
#[openapi(tag = "Tickets")]
#[put("/orders/<order_id>/tickets/<id>", data = "<request>")]
pub async fn update_ticket(
    order_id: i32,
    id: i32,
    auth: AuthenticatedUser,
    request: JsonBody<TicketRequest>,
    ticket_service: &State<TicketService>,
) -> Result<Json<Ticket>, AppError> {
    let ticket = ticket_service
        .update_ticket(auth.user_id, order_id, id, request.into_inner())
        .await?;
    Ok(Json(ticket))
}

/// Change the row, seat or flight of a ticket; the seat is checked again
#[openapi(tag = "Tickets")]
#[patch("/orders/<order_id>/tickets/<id>", data = "<patch>")]
pub async fn patch_ticket(
    order_id: i32,
    id: i32,
    auth: AuthenticatedUser,
    patch: JsonBody<TicketPatch>,
    ticket_service: &State<TicketService>,
) -> Result<Json<Ticket>, AppError> {
    let ticket = ticket_service
        .patch_ticket(auth.user_id, order_id, id, patch.into_inner())
        .await?;
    Ok(Json(ticket))
}

#[openapi(tag = "Tickets")]
#[delete("/orders/<order_id>/tickets/<id>")]
pub async fn delete_ticket(
    order_id: i32,
    id: i32,
    auth: AuthenticatedUser,
    ticket_service: &State<TicketService>,
) -> Result<NoContent, AppError> {
    ticket_service.delete_ticket(auth.user_id, order_id, id).await?;
    Ok(NoContent)
}
