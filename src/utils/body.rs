use crate::utils::error::{AppError, FieldErrors, NON_FIELD_ERRORS};
use okapi::openapi3::{MediaType, RequestBody};
use okapi::Map;
use rocket::data::{self, Data, FromData, Limits};
use rocket::http::Status;
use rocket::Request;
use rocket_okapi::gen::OpenApiGenerator;
use rocket_okapi::request::OpenApiFromData;
use schemars::gen::SchemaGenerator;
use schemars::schema::{InstanceType, RootSchema, Schema, SchemaObject, SingleOrVec};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const NOT_NULL_MESSAGE: &str = "This field may not be null.";

/// JSON request body whose parse failures are reported per field, the same
/// way validation failures are
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T> JsonBody<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

/// Error left by a rejected body for the catcher to render
pub struct RejectedBody(pub Option<AppError>);

fn reject<'r, T>(req: &'r Request<'_>, status: Status, error: AppError) -> data::Outcome<'r, T, AppError> {
    req.local_cache(|| RejectedBody(Some(error.clone())));
    data::Outcome::Error((status, error))
}

#[rocket::async_trait]
impl<'r, T: DeserializeOwned + JsonSchema> FromData<'r> for JsonBody<T> {
    type Error = AppError;

    async fn from_data(req: &'r Request<'_>, data: Data<'r>) -> data::Outcome<'r, Self> {
        let limit = req.limits().get("json").unwrap_or(Limits::JSON);
        let text = match data.open(limit).into_string().await {
            Ok(text) if text.is_complete() => text.into_inner(),
            Ok(_) => {
                let error = AppError::BadRequest(format!("Request body is larger than {}", limit));
                return reject(req, Status::PayloadTooLarge, error);
            }
            Err(e) => return reject(req, Status::BadRequest, AppError::BadRequest(e.to_string())),
        };

        match parse_body(&text) {
            Ok(body) => data::Outcome::Success(JsonBody(body)),
            Err(error) => reject(req, Status::BadRequest, error),
        }
    }
}

impl<'r, T: DeserializeOwned + JsonSchema> OpenApiFromData<'r> for JsonBody<T> {
    fn request_body(gen: &mut OpenApiGenerator) -> rocket_okapi::Result<RequestBody> {
        let schema = gen.json_schema::<T>();
        Ok(RequestBody {
            content: {
                let mut map = Map::new();
                map.insert(
                    "application/json".to_owned(),
                    MediaType {
                        schema: Some(schema),
                        ..MediaType::default()
                    },
                );
                map
            },
            required: true,
            ..RequestBody::default()
        })
    }
}

/// Parses `text` into `T`. Missing and mistyped fields are collected from the
/// type's JSON schema so every bad field is reported at once.
pub fn parse_body<T: DeserializeOwned + JsonSchema>(text: &str) -> Result<T, AppError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| AppError::BadRequest(format!("JSON parse error - {}", e)))?;

    match serde_json::from_value::<T>(value.clone()) {
        Ok(body) => Ok(body),
        Err(e) => {
            let root = SchemaGenerator::default().into_root_schema_for::<T>();
            let mut errors = FieldErrors::new();
            check_value(&root, &root.schema, &value, "", &mut errors);
            if errors.is_empty() {
                errors.insert(NON_FIELD_ERRORS.to_string(), vec![format!("Invalid data: {}", e)]);
            }
            Err(AppError::ValidationError(errors))
        }
    }
}

fn push(errors: &mut FieldErrors, path: &str, message: String) {
    let key = if path.is_empty() { NON_FIELD_ERRORS } else { path };
    errors.entry(key.to_string()).or_default().push(message);
}

fn resolve<'a>(root: &'a RootSchema, schema: &'a SchemaObject) -> Option<&'a SchemaObject> {
    let Some(reference) = &schema.reference else {
        return Some(schema);
    };
    let name = reference.rsplit('/').next()?;
    match root.definitions.get(name) {
        Some(Schema::Object(object)) => Some(object),
        _ => None,
    }
}

fn instance_types(schema: &SchemaObject) -> Vec<InstanceType> {
    match &schema.instance_type {
        Some(SingleOrVec::Single(single)) => vec![**single],
        Some(SingleOrVec::Vec(types)) => types.clone(),
        None => Vec::new(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn check_value(root: &RootSchema, schema: &SchemaObject, value: &Value, path: &str, errors: &mut FieldErrors) {
    let Some(schema) = resolve(root, schema) else {
        return;
    };

    // Option<Struct> is rendered as anyOf [struct, null]
    if let Some(any_of) = schema.subschemas.as_ref().and_then(|s| s.any_of.as_ref()) {
        if value.is_null() {
            return;
        }
        let inner = any_of.iter().find_map(|s| match s {
            Schema::Object(object) if !instance_types(object).contains(&InstanceType::Null) => Some(object),
            _ => None,
        });
        if let Some(inner) = inner {
            check_value(root, inner, value, path, errors);
        }
        return;
    }
    if let Some(all_of) = schema.subschemas.as_ref().and_then(|s| s.all_of.as_ref()) {
        for sub in all_of {
            if let Schema::Object(object) = sub {
                check_value(root, object, value, path, errors);
            }
        }
        return;
    }

    let types = instance_types(schema);
    if types.is_empty() {
        return;
    }
    if value.is_null() {
        if !types.contains(&InstanceType::Null) {
            push(errors, path, NOT_NULL_MESSAGE.to_string());
        }
        return;
    }

    if types.contains(&InstanceType::Integer) {
        let fits = match schema.format.as_deref() {
            Some("int32") => value.as_i64().map_or(false, |n| i32::try_from(n).is_ok()),
            _ => value.is_i64() || value.is_u64(),
        };
        if !fits {
            push(errors, path, "A valid integer is required.".to_string());
        }
    } else if types.contains(&InstanceType::Number) {
        if !value.is_number() {
            push(errors, path, "A valid number is required.".to_string());
        }
    } else if types.contains(&InstanceType::Boolean) {
        if !value.is_boolean() {
            push(errors, path, "Must be a valid boolean.".to_string());
        }
    } else if types.contains(&InstanceType::String) {
        check_string(schema, value, path, errors);
    } else if types.contains(&InstanceType::Array) {
        let Some(items) = value.as_array() else {
            push(
                errors,
                path,
                format!("Expected a list of items but got type \"{}\".", type_name(value)),
            );
            return;
        };
        if let Some(SingleOrVec::Single(item)) = schema.array.as_ref().and_then(|a| a.items.as_ref()) {
            if let Schema::Object(item) = item.as_ref() {
                for (i, element) in items.iter().enumerate() {
                    check_value(root, item, element, &format!("{}[{}]", path, i), errors);
                }
            }
        }
    } else if types.contains(&InstanceType::Object) {
        check_object(root, schema, value, path, errors);
    }
}

fn check_string(schema: &SchemaObject, value: &Value, path: &str, errors: &mut FieldErrors) {
    let Some(text) = value.as_str() else {
        push(errors, path, "Not a valid string.".to_string());
        return;
    };
    let message = match schema.format.as_deref() {
        Some("partial-date-time") if text.parse::<chrono::NaiveDateTime>().is_err() => {
            "Datetime has wrong format. Use one of these formats instead: YYYY-MM-DDThh:mm:ss."
        }
        Some("date") if text.parse::<chrono::NaiveDate>().is_err() => {
            "Date has wrong format. Use one of these formats instead: YYYY-MM-DD."
        }
        _ => return,
    };
    push(errors, path, message.to_string());
}

fn check_object(root: &RootSchema, schema: &SchemaObject, value: &Value, path: &str, errors: &mut FieldErrors) {
    let Some(fields) = value.as_object() else {
        push(
            errors,
            path,
            format!("Invalid data. Expected a dictionary, but got {}.", type_name(value)),
        );
        return;
    };
    let Some(object) = &schema.object else {
        return;
    };

    for (name, property) in &object.properties {
        let field_path = if path.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", path, name)
        };
        match fields.get(name) {
            None if object.required.contains(name) => push(errors, &field_path, REQUIRED_MESSAGE.to_string()),
            None => {}
            Some(field) => {
                if let Schema::Object(property) = property {
                    check_value(root, property, field, &field_path, errors);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::OrderCreateRequest;
    use crate::models::route::RouteRequest;

    fn field_errors(error: AppError) -> FieldErrors {
        match error {
            AppError::ValidationError(fields) => fields,
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn missing_fields_are_required() {
        let err = parse_body::<RouteRequest>(r#"{"source": 1}"#).unwrap_err();
        let fields = field_errors(err);

        assert_eq!(fields["destination"], vec![REQUIRED_MESSAGE.to_string()]);
        assert_eq!(fields["distance"], vec![REQUIRED_MESSAGE.to_string()]);
        assert!(!fields.contains_key("source"));
    }

    #[test]
    fn wrong_types_are_reported_per_field() {
        let err = parse_body::<RouteRequest>(r#"{"source": "a", "destination": null, "distance": 1.5}"#)
            .unwrap_err();
        let fields = field_errors(err);

        assert_eq!(fields["source"], vec!["A valid integer is required.".to_string()]);
        assert_eq!(fields["destination"], vec![NOT_NULL_MESSAGE.to_string()]);
        assert_eq!(fields["distance"], vec!["A valid integer is required.".to_string()]);
    }

    #[test]
    fn nested_ticket_errors_carry_their_position() {
        let err = parse_body::<OrderCreateRequest>(r#"{"tickets": [{"row": 1, "flight": 1}]}"#).unwrap_err();
        let fields = field_errors(err);

        assert_eq!(fields["tickets[0].seat"], vec![REQUIRED_MESSAGE.to_string()]);
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn tickets_must_be_a_list() {
        let err = parse_body::<OrderCreateRequest>(r#"{"tickets": 5}"#).unwrap_err();
        let fields = field_errors(err);

        assert_eq!(
            fields["tickets"],
            vec!["Expected a list of items but got type \"int\".".to_string()]
        );
    }

    #[test]
    fn non_object_body_is_a_non_field_error() {
        let err = parse_body::<RouteRequest>("[1, 2]").unwrap_err();
        let fields = field_errors(err);

        assert_eq!(
            fields[NON_FIELD_ERRORS],
            vec!["Invalid data. Expected a dictionary, but got list.".to_string()]
        );
    }

    #[test]
    fn malformed_json_is_a_bad_request() {
        let err = parse_body::<RouteRequest>("{not json").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn valid_body_parses() {
        let request = parse_body::<RouteRequest>(r#"{"source": 1, "destination": 2, "distance": 300}"#).unwrap();
        assert_eq!((request.source, request.destination, request.distance), (1, 2, 300));
    }
}
