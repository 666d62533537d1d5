use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::{Request, Response};
use serde::Serialize;

/// JSON body answered with 201 Created
#[derive(Debug)]
pub struct Created<T>(pub T);

/// Empty 204 answer for deletes
#[derive(Debug)]
pub struct NoContent;

impl<'r, T: Serialize> Responder<'r, 'static> for Created<T> {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        Response::build_from(Json(self.0).respond_to(request)?)
            .status(Status::Created)
            .ok()
    }
}

impl<'r> Responder<'r, 'static> for NoContent {
    fn respond_to(self, _: &'r Request<'_>) -> rocket::response::Result<'static> {
        Response::build().status(Status::NoContent).ok()
    }
}
