use serde_json::Value;

use super::{Fields, ValidationError};
use crate::database::models::NewReviewRequest;
use crate::types::RequestStatus;

const MESSAGE: &str = "Invalid review request data";
const STATUSES: &str = "pending, completed, expired";

pub fn new_review_request(body: &Value) -> Result<NewReviewRequest, ValidationError> {
    let mut fields = Fields::new(body, MESSAGE)?;

    let client_id = fields.required_string("clientId");
    let message = fields.required_string("message");
    let status = fields.optional_enum::<RequestStatus>("status", STATUSES);

    fields.finish(MESSAGE)?;
    match (client_id, message) {
        (Some(client_id), Some(message)) => Ok(NewReviewRequest {
            client_id,
            message,
            status: status.unwrap_or_default(),
        }),
        _ => Err(ValidationError::new(MESSAGE, Vec::new())),
    }
}

/// `{status}` body of the status endpoint. Anything but a known status is
/// reported as "Invalid status".
pub fn status_update(body: &Value) -> Result<RequestStatus, ValidationError> {
    body.get("status")
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .ok_or_else(invalid_status)
}

pub fn invalid_status() -> ValidationError {
    ValidationError::single("Invalid status", "status", format!("Expected one of: {}", STATUSES))
}
