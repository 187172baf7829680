use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Local mirror of an identity-service user. The identity service stays
/// authoritative; this row only exists so owned records have a foreign key.
/// Email is informational: it may be absent and is not unique, since the
/// identity service can reassign an address to a new id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub const DEFAULT_ROLE: &'static str = "agent";
}
