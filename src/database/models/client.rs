use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::{ClientStatus, ClientType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[sqlx(try_from = "String")]
    pub client_type: ClientType,
    pub property_type: String,
    #[sqlx(try_from = "String")]
    pub status: ClientStatus,
    pub created_at: DateTime<Utc>,
}

/// Validated create payload. Owner, id and timestamp are assigned by storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub client_type: ClientType,
    pub property_type: String,
    pub status: ClientStatus,
}

/// Partial update; `None` leaves a column untouched. `phone` can be cleared
/// explicitly with `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub client_type: Option<ClientType>,
    pub property_type: Option<String>,
    pub status: Option<ClientStatus>,
}

impl ClientPatch {
    /// Apply the provided fields to an in-memory row
    pub fn apply_to(&self, client: &mut Client) {
        if let Some(name) = &self.name {
            client.name = name.clone();
        }
        if let Some(email) = &self.email {
            client.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            client.phone = phone.clone();
        }
        if let Some(client_type) = self.client_type {
            client.client_type = client_type;
        }
        if let Some(property_type) = &self.property_type {
            client.property_type = property_type.clone();
        }
        if let Some(status) = self.status {
            client.status = status;
        }
    }
}
