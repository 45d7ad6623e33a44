use actix_web::{error::InternalError, HttpResponse};

use crate::api::job::dto::ErrorResponse;

fn bad_request(message: &str, fields: Option<serde_json::Value>) -> actix_web::Error {
    InternalError::from_response(
        "",
        HttpResponse::BadRequest().json(ErrorResponse {
            message: message.to_string(),
            fields,
        }),
    )
    .into()
}

/// Maps a JSON deserialization failure to a short explanation
fn describe_json_error(err: &str) -> &'static str {
    if err.contains("EOF while parsing") {
        "Request body is empty. Expected JSON payload"
    } else if err.contains("unknown variant") {
        "Invalid enum value. Check allowed values for this field"
    } else if err.contains("Invalid date") {
        "Invalid date. Expected YYYY-MM-DD"
    } else {
        "Invalid JSON format"
    }
}

/// Struct field name as it appears on the wire (`job_link` -> `jobLink`)
fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            name.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}

/// JSON extractor config for validated payloads (create, update)
pub fn json_config() -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default()
        .error_handler(|err, _req| match err {
            actix_web_validator::Error::Validate(validation_errors) => {
                let mut fields = serde_json::Map::new();
                for (field, errors) in validation_errors.field_errors() {
                    let messages: Vec<String> = errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| format!("Validation error in field: {}", field))
                        })
                        .collect();
                    fields.insert(wire_name(&field), serde_json::json!({ "errors": messages }));
                }
                let message = crate::api::validation_messages(&validation_errors).join("; ");
                bad_request(&message, Some(serde_json::Value::Object(fields)))
            }
            actix_web_validator::Error::Deserialize(de_err) => {
                bad_request(describe_json_error(&de_err.to_string()), None)
            }
            _ => bad_request("Validation failed", None),
        })
}

/// JSON extractor config for payloads validated by the store (filter, bulk)
pub fn plain_json_config() -> actix_web::web::JsonConfig {
    actix_web::web::JsonConfig::default()
        .error_handler(|err, _req| bad_request(describe_json_error(&err.to_string()), None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_get_readable_messages() {
        assert_eq!(
            describe_json_error("EOF while parsing a value at line 1 column 0"),
            "Request body is empty. Expected JSON payload"
        );
        assert_eq!(
            describe_json_error("unknown variant `Hired`, expected one of ..."),
            "Invalid enum value. Check allowed values for this field"
        );
        assert_eq!(describe_json_error("expected `,`"), "Invalid JSON format");
    }

    #[test]
    fn field_names_use_wire_casing() {
        assert_eq!(wire_name("job_link"), "jobLink");
        assert_eq!(wire_name("applied_date"), "appliedDate");
        assert_eq!(wire_name("company"), "company");
    }
}
