//! In-process store with the same ownership semantics as [`PgStore`].
//! Used by the test suite and by `DATABASE_URL=memory:` local runs.
//!
//! [`PgStore`]: crate::database::PgStore

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::models::review_request::completed_at_for;
use crate::database::models::{
    Client, ClientPatch, NewClient, NewReviewRequest, NewTestimonial, ReviewRequest, Testimonial, User,
};
use crate::database::store::{new_id, RatingSummary, RepositoryError, Store};
use crate::types::RequestStatus;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    clients: Vec<Client>,
    review_requests: Vec<ReviewRequest>,
    testimonials: Vec<Testimonial>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Rows owned by `owner`, newest first. Ties keep reverse insertion order.
fn newest_first<T: Clone, K: Ord>(
    rows: &[T],
    owned: impl Fn(&T) -> bool,
    key: impl Fn(&T) -> K,
) -> Vec<T> {
    let mut out: Vec<T> = rows.iter().rev().filter(|r| owned(r)).cloned().collect();
    out.sort_by(|a, b| key(b).cmp(&key(a)));
    out
}

#[async_trait]
impl Store for MemoryStore {
    async fn upsert_user(&self, id: &str, email: Option<&str>, name: &str) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == id) {
            user.email = email.map(str::to_string);
            user.name = name.to_string();
            return Ok(user.clone());
        }

        let user = User {
            id: id.to_string(),
            email: email.map(str::to_string),
            name: name.to_string(),
            role: User::DEFAULT_ROLE.to_string(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_clients(&self, owner: &str) -> Result<Vec<Client>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.clients, |c| c.user_id == owner, |c| c.created_at))
    }

    async fn get_client(&self, id: &str, owner: &str) -> Result<Option<Client>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .clients
            .iter()
            .find(|c| c.id == id && c.user_id == owner)
            .cloned())
    }

    async fn insert_client(&self, owner: &str, input: &NewClient) -> Result<Client, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|u| u.id == owner) {
            return Err(RepositoryError::Constraint(format!("user '{}' does not exist", owner)));
        }

        let client = Client {
            id: new_id(),
            user_id: owner.to_string(),
            name: input.name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            client_type: input.client_type,
            property_type: input.property_type.clone(),
            status: input.status,
            created_at: Utc::now(),
        };
        tables.clients.push(client.clone());
        Ok(client)
    }

    async fn update_client(
        &self,
        id: &str,
        owner: &str,
        patch: &ClientPatch,
    ) -> Result<Option<Client>, RepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .clients
            .iter_mut()
            .find(|c| c.id == id && c.user_id == owner)
            .map(|client| {
                patch.apply_to(client);
                client.clone()
            }))
    }

    async fn delete_client(&self, id: &str, owner: &str) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        let before = tables.clients.len();
        tables.clients.retain(|c| !(c.id == id && c.user_id == owner));
        if tables.clients.len() == before {
            return Ok(false);
        }

        // Mirrors ON DELETE CASCADE / SET NULL
        let removed_requests: Vec<String> = tables
            .review_requests
            .iter()
            .filter(|r| r.client_id == id)
            .map(|r| r.id.clone())
            .collect();
        tables.review_requests.retain(|r| r.client_id != id);
        tables.testimonials.retain(|t| t.client_id != id);
        for testimonial in tables.testimonials.iter_mut() {
            if testimonial
                .request_id
                .as_ref()
                .is_some_and(|rid| removed_requests.contains(rid))
            {
                testimonial.request_id = None;
            }
        }
        Ok(true)
    }

    async fn count_clients(&self, owner: &str) -> Result<i64, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.clients.iter().filter(|c| c.user_id == owner).count() as i64)
    }

    async fn list_review_requests(&self, owner: &str) -> Result<Vec<ReviewRequest>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.review_requests, |r| r.user_id == owner, |r| r.sent_at))
    }

    async fn get_review_request(&self, id: &str, owner: &str) -> Result<Option<ReviewRequest>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .review_requests
            .iter()
            .find(|r| r.id == id && r.user_id == owner)
            .cloned())
    }

    async fn insert_review_request(
        &self,
        owner: &str,
        input: &NewReviewRequest,
    ) -> Result<ReviewRequest, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables
            .clients
            .iter()
            .any(|c| c.id == input.client_id && c.user_id == owner)
        {
            return Err(RepositoryError::unknown_client());
        }

        let now = Utc::now();
        let request = ReviewRequest {
            id: new_id(),
            user_id: owner.to_string(),
            client_id: input.client_id.clone(),
            message: input.message.clone(),
            status: input.status,
            sent_at: now,
            completed_at: completed_at_for(input.status, now),
        };
        tables.review_requests.push(request.clone());
        Ok(request)
    }

    async fn update_review_request_status(
        &self,
        id: &str,
        owner: &str,
        status: RequestStatus,
    ) -> Result<Option<ReviewRequest>, RepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .review_requests
            .iter_mut()
            .find(|r| r.id == id && r.user_id == owner)
            .map(|request| {
                request.status = status;
                request.completed_at = completed_at_for(status, Utc::now());
                request.clone()
            }))
    }

    async fn count_review_requests(&self, owner: &str, status: RequestStatus) -> Result<i64, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .review_requests
            .iter()
            .filter(|r| r.user_id == owner && r.status == status)
            .count() as i64)
    }

    async fn list_testimonials(&self, owner: &str) -> Result<Vec<Testimonial>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.testimonials, |t| t.user_id == owner, |t| t.created_at))
    }

    async fn get_testimonial(&self, id: &str, owner: &str) -> Result<Option<Testimonial>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .testimonials
            .iter()
            .find(|t| t.id == id && t.user_id == owner)
            .cloned())
    }

    async fn insert_testimonial(&self, owner: &str, input: &NewTestimonial) -> Result<Testimonial, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables
            .clients
            .iter()
            .any(|c| c.id == input.client_id && c.user_id == owner)
        {
            return Err(RepositoryError::unknown_client());
        }
        if let Some(request_id) = &input.request_id {
            if !tables
                .review_requests
                .iter()
                .any(|r| &r.id == request_id && r.user_id == owner)
            {
                return Err(RepositoryError::unknown_request());
            }
        }

        let testimonial = Testimonial {
            id: new_id(),
            user_id: owner.to_string(),
            client_id: input.client_id.clone(),
            request_id: input.request_id.clone(),
            content: input.content.clone(),
            rating: input.rating,
            property_type: input.property_type.clone(),
            is_public: input.is_public,
            created_at: Utc::now(),
        };
        tables.testimonials.push(testimonial.clone());
        Ok(testimonial)
    }

    async fn rating_summary(&self, owner: &str) -> Result<RatingSummary, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .testimonials
            .iter()
            .filter(|t| t.user_id == owner)
            .fold(RatingSummary::default(), |acc, t| RatingSummary {
                count: acc.count + 1,
                sum: acc.sum + i64::from(t.rating),
            }))
    }
}
