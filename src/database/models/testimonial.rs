use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Client-authored rating and text. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: String,
    pub user_id: String,
    pub client_id: String,
    pub request_id: Option<String>,
    pub content: String,
    pub rating: i32,
    pub property_type: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTestimonial {
    pub client_id: String,
    pub request_id: Option<String>,
    pub content: String,
    pub rating: i32,
    pub property_type: Option<String>,
    pub is_public: bool,
}
