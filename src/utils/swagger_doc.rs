use crate::utils::error::AppError;
use crate::utils::response::{Created, NoContent};
use indexmap::IndexMap;
use okapi::openapi3::SchemaObject;
use rocket::http::Status;
use rocket_okapi::gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::RefOr;
use rocket_okapi::okapi::openapi3::{MediaType, Response, Responses};
use rocket_okapi::response::OpenApiResponderInner;
use schemars::JsonSchema;

use crate::utils::error::error_body;

fn json_response(description: &str, schema: SchemaObject, example: Option<serde_json::Value>) -> RefOr<Response> {
    RefOr::Object(Response {
        description: description.to_string(),
        content: {
            let mut content = IndexMap::new();
            content.insert(
                "application/json".to_string(),
                MediaType {
                    schema: Some(schema),
                    example,
                    ..Default::default()
                },
            );
            content
        },
        ..Default::default()
    })
}

impl OpenApiResponderInner for AppError {
    fn responses(_gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        let mut responses = Responses::default();

        // Define error responses
        let error_responses = [
            (Status::BadRequest, "Bad Request", AppError::non_field("The source and the destination can't be the same.")),
            (Status::Unauthorized, "Unauthorized", AppError::AuthError("Unauthorized".to_string())),
            (Status::Forbidden, "Forbidden", AppError::Forbidden("Forbidden".to_string())),
            (Status::NotFound, "NotFound", AppError::NotFound("Not Found".to_string())),
            (Status::MethodNotAllowed, "MethodNotAllowed", AppError::MethodNotAllowed("Method Not Allowed".to_string())),
            (Status::Conflict, "Conflict", AppError::Conflict("Conflict".to_string())),
            (Status::InternalServerError, "InternalServerError", AppError::DatabaseError("Internal ServerError".to_string())),
            (Status::UnprocessableEntity, "Unprocessable", AppError::Unprocessable("Unprocessable".to_string())),
        ];

        for (status, description, error) in error_responses {
            responses.responses.insert(
                status.code.to_string(),
                json_response(description, SchemaObject::default(), Some(error_body(&error))),
            );
        }

        Ok(responses)
    }
}

impl<T: JsonSchema> OpenApiResponderInner for Created<T> {
    fn responses(gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        let mut responses = Responses::default();
        responses.responses.insert(
            Status::Created.code.to_string(),
            json_response("Created", gen.json_schema::<T>(), None),
        );
        Ok(responses)
    }
}

impl OpenApiResponderInner for NoContent {
    fn responses(_gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        let mut responses = Responses::default();
        responses.responses.insert(
            Status::NoContent.code.to_string(),
            RefOr::Object(Response {
                description: "No Content".to_string(),
                ..Default::default()
            }),
        );
        Ok(responses)
    }
}
