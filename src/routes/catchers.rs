use crate::utils::body::RejectedBody;
use crate::utils::error::{error_body, AppError};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::Request;
use serde_json::{json, Value};

/// Message for failures that never reached a handler (guards, body parsing,
/// unknown paths)
pub fn status_message(status: Status) -> String {
    match status.code {
        400 => "Malformed request".to_string(),
        401 => "Authentication credentials were not provided".to_string(),
        403 => "You do not have permission to perform this action".to_string(),
        404 => "Not found".to_string(),
        405 => "Method not allowed".to_string(),
        415 => "Unsupported media type".to_string(),
        422 => "Request body could not be parsed".to_string(),
        _ => status.reason().unwrap_or("Internal server error").to_string(),
    }
}

fn segments_match(pattern: &str, path: &str) -> bool {
    let pattern: Vec<&str> = pattern.trim_matches('/').split('/').collect();
    let path: Vec<&str> = path.trim_matches('/').split('/').collect();
    pattern.len() == path.len()
        && pattern
            .iter()
            .zip(&path)
            .all(|(expected, actual)| expected.starts_with('<') || expected == actual)
}

/// True when the path is mounted but only under other methods
fn served_by_other_method(request: &Request<'_>) -> bool {
    let path = request.uri().path();
    let (same, other): (Vec<_>, Vec<_>) = request
        .rocket()
        .routes()
        .filter(|route| segments_match(route.uri.path(), path.as_str()))
        .partition(|route| route.method == request.method());
    same.is_empty() && !other.is_empty()
}

// A rejected JSON body leaves its field errors behind for this catcher
#[catch(default)]
pub fn json_catcher(status: Status, request: &Request<'_>) -> (Status, Json<Value>) {
    if let RejectedBody(Some(error)) = request.local_cache(|| RejectedBody(None)) {
        return (status, Json(error_body(error)));
    }
    if status == Status::NotFound && served_by_other_method(request) {
        let error = AppError::method_not_allowed(request.method().as_str());
        return (Status::MethodNotAllowed, Json(error_body(&error)));
    }
    (status, Json(json!({ "error": status_message(status) })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_get_client_messages() {
        assert_eq!(
            status_message(Status::Unauthorized),
            "Authentication credentials were not provided"
        );
        assert_eq!(status_message(Status::NotFound), "Not found");
        assert_eq!(status_message(Status::ImATeapot), "I'm a teapot");
    }

    #[test]
    fn dynamic_segments_match_any_value() {
        assert!(segments_match("/api/countries/<id>", "/api/countries/7"));
        assert!(segments_match("/api/countries", "/api/countries/"));
        assert!(!segments_match("/api/countries/<id>", "/api/countries"));
        assert!(!segments_match("/api/cities/<id>", "/api/countries/7"));
    }
}
