use serde::{Deserialize, Serialize};

use crate::database::{RatingSummary, RepositoryError, TenantRepository};
use crate::types::RequestStatus;

/// Headline numbers for the dashboard of one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_clients: i64,
    pub reviews_received: i64,
    pub pending_requests: i64,
    pub avg_rating: f64,
}

/// Read-only aggregate over the tenant's rows. The three reads run
/// concurrently and are not required to share a snapshot.
pub async fn compute_stats(tenant: &TenantRepository) -> Result<DashboardStats, RepositoryError> {
    let clients = tenant.clients();
    let requests = tenant.review_requests();
    let testimonials = tenant.testimonials();

    let (total_clients, pending_requests, ratings) = futures::try_join!(
        clients.count(),
        requests.count_with_status(RequestStatus::Pending),
        testimonials.rating_summary(),
    )?;

    Ok(DashboardStats {
        total_clients,
        reviews_received: ratings.count,
        pending_requests,
        avg_rating: average_rating(ratings),
    })
}

/// Mean rating rounded to one decimal; `0` when there are no ratings
pub fn average_rating(summary: RatingSummary) -> f64 {
    if summary.count == 0 {
        return 0.0;
    }
    let mean = summary.sum as f64 / summary.count as f64;
    (mean * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Identity;
    use crate::database::models::{NewClient, NewReviewRequest, NewTestimonial};
    use crate::database::{MemoryStore, Store};
    use crate::types::{ClientStatus, ClientType};
    use std::sync::Arc;

    fn summary(ratings: &[i64]) -> RatingSummary {
        RatingSummary {
            count: ratings.len() as i64,
            sum: ratings.iter().sum(),
        }
    }

    #[test]
    fn average_is_zero_without_ratings() {
        assert_eq!(average_rating(summary(&[])), 0.0);
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        assert_eq!(average_rating(summary(&[5, 5, 4])), 4.7);
        assert_eq!(average_rating(summary(&[4, 5])), 4.5);
        assert_eq!(average_rating(summary(&[1, 2, 2])), 1.7);
        assert_eq!(average_rating(summary(&[3])), 3.0);
    }

    #[tokio::test]
    async fn computes_stats_for_one_tenant_only() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let alice = TenantRepository::new(store.clone(), Identity::new("alice", Some("a@x.com".into()), None));
        let bob = TenantRepository::new(store, Identity::new("bob", Some("b@x.com".into()), None));

        let client = alice
            .clients()
            .create(&NewClient {
                name: "Jane Doe".into(),
                email: "jane@x.com".into(),
                phone: None,
                client_type: ClientType::Buyer,
                property_type: "condo".into(),
                status: ClientStatus::Active,
            })
            .await
            .unwrap();

        for status in [RequestStatus::Pending, RequestStatus::Pending, RequestStatus::Completed] {
            alice
                .review_requests()
                .create(&NewReviewRequest {
                    client_id: client.id.clone(),
                    message: "Please review".into(),
                    status,
                })
                .await
                .unwrap();
        }
        for rating in [5, 5, 4] {
            alice
                .testimonials()
                .create(&NewTestimonial {
                    client_id: client.id.clone(),
                    request_id: None,
                    content: "Great".into(),
                    rating,
                    property_type: None,
                    is_public: true,
                })
                .await
                .unwrap();
        }

        let stats = compute_stats(&alice).await.unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                total_clients: 1,
                reviews_received: 3,
                pending_requests: 2,
                avg_rating: 4.7,
            }
        );

        let empty = compute_stats(&bob).await.unwrap();
        assert_eq!(empty.total_clients, 0);
        assert_eq!(empty.avg_rating, 0.0);
    }
}
