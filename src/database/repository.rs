use std::sync::Arc;

use crate::auth::Identity;
use crate::database::models::{
    Client, ClientPatch, NewClient, NewReviewRequest, NewTestimonial, ReviewRequest, Testimonial, User,
};
use crate::database::store::{RatingSummary, RepositoryError, Store};
use crate::types::RequestStatus;

/// A [`Store`] bound to one verified owner.
///
/// This is the only way handlers reach storage. The owner comes from the
/// verified identity when the repository is built, so no operation can be
/// called with an owner taken from a request payload.
#[derive(Clone)]
pub struct TenantRepository {
    store: Arc<dyn Store>,
    owner: Identity,
}

impl TenantRepository {
    pub fn new(store: Arc<dyn Store>, owner: Identity) -> Self {
        Self { store, owner }
    }

    pub fn owner(&self) -> &Identity {
        &self.owner
    }

    /// Creates or refreshes the local mirror row for the owner. An identity
    /// without an email is mirrored with none.
    pub async fn sync_user(&self) -> Result<User, RepositoryError> {
        let email = Some(self.owner.email.as_str()).filter(|e| !e.is_empty());
        self.store.upsert_user(&self.owner.id, email, &self.owner.name).await
    }

    pub fn clients(&self) -> Clients<'_> {
        Clients { tenant: self }
    }

    pub fn review_requests(&self) -> ReviewRequests<'_> {
        ReviewRequests { tenant: self }
    }

    pub fn testimonials(&self) -> Testimonials<'_> {
        Testimonials { tenant: self }
    }

    fn owner_id(&self) -> &str {
        &self.owner.id
    }
}

pub struct Clients<'a> {
    tenant: &'a TenantRepository,
}

impl Clients<'_> {
    pub async fn list(&self) -> Result<Vec<Client>, RepositoryError> {
        self.tenant.store.list_clients(self.tenant.owner_id()).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Client>, RepositoryError> {
        self.tenant.store.get_client(id, self.tenant.owner_id()).await
    }

    pub async fn create(&self, input: &NewClient) -> Result<Client, RepositoryError> {
        // Clients reference the owner's mirror row
        self.tenant.sync_user().await?;
        self.tenant.store.insert_client(self.tenant.owner_id(), input).await
    }

    pub async fn update(&self, id: &str, patch: &ClientPatch) -> Result<Option<Client>, RepositoryError> {
        self.tenant.store.update_client(id, self.tenant.owner_id(), patch).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        self.tenant.store.delete_client(id, self.tenant.owner_id()).await
    }

    pub async fn count(&self) -> Result<i64, RepositoryError> {
        self.tenant.store.count_clients(self.tenant.owner_id()).await
    }
}

pub struct ReviewRequests<'a> {
    tenant: &'a TenantRepository,
}

impl ReviewRequests<'_> {
    pub async fn list(&self) -> Result<Vec<ReviewRequest>, RepositoryError> {
        self.tenant.store.list_review_requests(self.tenant.owner_id()).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<ReviewRequest>, RepositoryError> {
        self.tenant.store.get_review_request(id, self.tenant.owner_id()).await
    }

    pub async fn create(&self, input: &NewReviewRequest) -> Result<ReviewRequest, RepositoryError> {
        self.tenant.store.insert_review_request(self.tenant.owner_id(), input).await
    }

    /// `Completed` stamps `completed_at` with the current time; any other
    /// status clears it.
    pub async fn update_status(
        &self,
        id: &str,
        status: RequestStatus,
    ) -> Result<Option<ReviewRequest>, RepositoryError> {
        self.tenant
            .store
            .update_review_request_status(id, self.tenant.owner_id(), status)
            .await
    }

    pub async fn count_with_status(&self, status: RequestStatus) -> Result<i64, RepositoryError> {
        self.tenant
            .store
            .count_review_requests(self.tenant.owner_id(), status)
            .await
    }
}

pub struct Testimonials<'a> {
    tenant: &'a TenantRepository,
}

impl Testimonials<'_> {
    pub async fn list(&self) -> Result<Vec<Testimonial>, RepositoryError> {
        self.tenant.store.list_testimonials(self.tenant.owner_id()).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Testimonial>, RepositoryError> {
        self.tenant.store.get_testimonial(id, self.tenant.owner_id()).await
    }

    /// Stores the testimonial only. A referenced review request keeps its
    /// status; completing it is the caller's call.
    pub async fn create(&self, input: &NewTestimonial) -> Result<Testimonial, RepositoryError> {
        self.tenant.store.insert_testimonial(self.tenant.owner_id(), input).await
    }

    pub async fn rating_summary(&self) -> Result<RatingSummary, RepositoryError> {
        self.tenant.store.rating_summary(self.tenant.owner_id()).await
    }
}
