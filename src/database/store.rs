use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{
    Client, ClientPatch, NewClient, NewReviewRequest, NewTestimonial, ReviewRequest, Testimonial, User,
};
use crate::types::RequestStatus;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A referenced row is missing or belongs to another owner. The two cases
    /// are deliberately not distinguished.
    #[error("{entity} not found")]
    UnknownReference {
        field: &'static str,
        entity: &'static str,
    },

    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

impl RepositoryError {
    pub fn unknown_client() -> Self {
        RepositoryError::UnknownReference {
            field: "clientId",
            entity: "Client",
        }
    }

    pub fn unknown_request() -> Self {
        RepositoryError::UnknownReference {
            field: "requestId",
            entity: "Review request",
        }
    }
}

/// Count and sum of testimonial ratings for one owner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingSummary {
    pub count: i64,
    pub sum: i64,
}

/// Row storage for the four tables. Every owned-row method takes the owner
/// id and must apply it in the same statement that reads or writes the row.
///
/// Callers outside this module go through [`TenantRepository`], which binds
/// the owner once per request.
///
/// [`TenantRepository`]: crate::database::TenantRepository
#[async_trait]
pub trait Store: Send + Sync {
    async fn upsert_user(&self, id: &str, email: Option<&str>, name: &str) -> Result<User, RepositoryError>;
    async fn get_user(&self, id: &str) -> Result<Option<User>, RepositoryError>;

    async fn list_clients(&self, owner: &str) -> Result<Vec<Client>, RepositoryError>;
    async fn get_client(&self, id: &str, owner: &str) -> Result<Option<Client>, RepositoryError>;
    async fn insert_client(&self, owner: &str, input: &NewClient) -> Result<Client, RepositoryError>;
    async fn update_client(
        &self,
        id: &str,
        owner: &str,
        patch: &ClientPatch,
    ) -> Result<Option<Client>, RepositoryError>;
    async fn delete_client(&self, id: &str, owner: &str) -> Result<bool, RepositoryError>;
    async fn count_clients(&self, owner: &str) -> Result<i64, RepositoryError>;

    async fn list_review_requests(&self, owner: &str) -> Result<Vec<ReviewRequest>, RepositoryError>;
    async fn get_review_request(&self, id: &str, owner: &str) -> Result<Option<ReviewRequest>, RepositoryError>;
    async fn insert_review_request(
        &self,
        owner: &str,
        input: &NewReviewRequest,
    ) -> Result<ReviewRequest, RepositoryError>;
    async fn update_review_request_status(
        &self,
        id: &str,
        owner: &str,
        status: RequestStatus,
    ) -> Result<Option<ReviewRequest>, RepositoryError>;
    async fn count_review_requests(&self, owner: &str, status: RequestStatus) -> Result<i64, RepositoryError>;

    async fn list_testimonials(&self, owner: &str) -> Result<Vec<Testimonial>, RepositoryError>;
    async fn get_testimonial(&self, id: &str, owner: &str) -> Result<Option<Testimonial>, RepositoryError>;
    async fn insert_testimonial(&self, owner: &str, input: &NewTestimonial) -> Result<Testimonial, RepositoryError>;
    async fn rating_summary(&self, owner: &str) -> Result<RatingSummary, RepositoryError>;
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
