use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::RequestStatus;

/// Outreach record asking a client for a testimonial.
///
/// `completed_at` is set if and only if `status` is `Completed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub id: String,
    pub user_id: String,
    pub client_id: String,
    pub message: String,
    #[sqlx(try_from = "String")]
    pub status: RequestStatus,
    pub sent_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReviewRequest {
    pub client_id: String,
    pub message: String,
    pub status: RequestStatus,
}

/// Completion timestamp implied by a status change made at `now`
pub fn completed_at_for(status: RequestStatus, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match status {
        RequestStatus::Completed => Some(now),
        RequestStatus::Pending | RequestStatus::Expired => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_completed_carries_a_timestamp() {
        let now = Utc::now();
        assert_eq!(completed_at_for(RequestStatus::Completed, now), Some(now));
        assert_eq!(completed_at_for(RequestStatus::Pending, now), None);
        assert_eq!(completed_at_for(RequestStatus::Expired, now), None);
    }
}
