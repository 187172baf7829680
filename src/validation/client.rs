use serde_json::Value;

use super::{Fields, ValidationError};
use crate::database::models::{ClientPatch, NewClient};
use crate::types::{ClientStatus, ClientType};

const MESSAGE: &str = "Invalid client data";
const CLIENT_TYPES: &str = "buyer, seller, both";
const STATUSES: &str = "active, closed, inactive";

/// Client create payload. `status` defaults to active.
pub fn new_client(body: &Value) -> Result<NewClient, ValidationError> {
    let mut fields = Fields::new(body, MESSAGE)?;

    let name = fields.required_string("name");
    let email = fields.required_email("email");
    let phone = fields.nullable_string("phone").flatten();
    let client_type = fields.required_enum::<ClientType>("clientType", CLIENT_TYPES);
    let property_type = fields.required_string("propertyType");
    let status = fields.optional_enum::<ClientStatus>("status", STATUSES);

    fields.finish(MESSAGE)?;
    match (name, email, client_type, property_type) {
        (Some(name), Some(email), Some(client_type), Some(property_type)) => Ok(NewClient {
            name,
            email,
            phone,
            client_type,
            property_type,
            status: status.unwrap_or_default(),
        }),
        _ => Err(ValidationError::new(MESSAGE, Vec::new())),
    }
}

/// Client update payload; only fields present in the body are changed
pub fn client_patch(body: &Value) -> Result<ClientPatch, ValidationError> {
    let mut fields = Fields::new(body, MESSAGE)?;

    let patch = ClientPatch {
        name: fields.optional_string("name"),
        email: fields.optional_email("email"),
        phone: fields.nullable_string("phone"),
        client_type: fields.optional_enum("clientType", CLIENT_TYPES),
        property_type: fields.optional_string("propertyType"),
        status: fields.optional_enum("status", STATUSES),
    };

    fields.finish(MESSAGE)?;
    Ok(patch)
}
