//! PostgreSQL store. Every owned-row statement filters on `user_id` in the
//! same statement that touches the row, so there is no window between an
//! ownership check and the write.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::database::models::review_request::completed_at_for;
use crate::database::models::{
    Client, ClientPatch, NewClient, NewReviewRequest, NewTestimonial, ReviewRequest, Testimonial, User,
};
use crate::database::store::{new_id, RatingSummary, RepositoryError, Store};
use crate::types::RequestStatus;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn client_exists(&self, id: &str, owner: &str) -> Result<bool, RepositoryError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM clients WHERE id = $1 AND user_id = $2)")
                .bind(id)
                .bind(owner)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn upsert_user(&self, id: &str, email: Option<&str>, name: &str) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, role, created_at)
            VALUES ($1, $2, $3, $4, now())
            ON CONFLICT (id) DO UPDATE SET email = EXCLUDED.email, name = EXCLUDED.name
            RETURNING id, email, name, role, created_at
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(name)
        .bind(User::DEFAULT_ROLE)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>("SELECT id, email, name, role, created_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_clients(&self, owner: &str) -> Result<Vec<Client>, RepositoryError> {
        let rows = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE user_id = $1 ORDER BY created_at DESC, seq DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_client(&self, id: &str, owner: &str) -> Result<Option<Client>, RepositoryError> {
        let row = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_client(&self, owner: &str, input: &NewClient) -> Result<Client, RepositoryError> {
        let row = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (id, user_id, name, email, phone, client_type, property_type, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(new_id())
        .bind(owner)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.client_type.as_str())
        .bind(&input.property_type)
        .bind(input.status.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_client(
        &self,
        id: &str,
        owner: &str,
        patch: &ClientPatch,
    ) -> Result<Option<Client>, RepositoryError> {
        let row = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients SET
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                phone = CASE WHEN $5 THEN $6 ELSE phone END,
                client_type = COALESCE($7, client_type),
                property_type = COALESCE($8, property_type),
                status = COALESCE($9, status)
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(&patch.name)
        .bind(&patch.email)
        .bind(patch.phone.is_some())
        .bind(patch.phone.clone().flatten())
        .bind(patch.client_type.map(|t| t.as_str()))
        .bind(&patch.property_type)
        .bind(patch.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_client(&self, id: &str, owner: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_clients(&self, owner: &str) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients WHERE user_id = $1")
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_review_requests(&self, owner: &str) -> Result<Vec<ReviewRequest>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRequest>(
            "SELECT * FROM review_requests WHERE user_id = $1 ORDER BY sent_at DESC, seq DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_review_request(&self, id: &str, owner: &str) -> Result<Option<ReviewRequest>, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewRequest>("SELECT * FROM review_requests WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_review_request(
        &self,
        owner: &str,
        input: &NewReviewRequest,
    ) -> Result<ReviewRequest, RepositoryError> {
        let now = Utc::now();
        // The client must belong to the same owner; checked by the insert itself
        let row = sqlx::query_as::<_, ReviewRequest>(
            r#"
            INSERT INTO review_requests (id, user_id, client_id, message, status, sent_at, completed_at)
            SELECT $1, c.user_id, c.id, $4, $5, $6, $7
            FROM clients c
            WHERE c.id = $3 AND c.user_id = $2
            RETURNING *
            "#,
        )
        .bind(new_id())
        .bind(owner)
        .bind(&input.client_id)
        .bind(&input.message)
        .bind(input.status.as_str())
        .bind(now)
        .bind(completed_at_for(input.status, now))
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(RepositoryError::unknown_client)
    }

    async fn update_review_request_status(
        &self,
        id: &str,
        owner: &str,
        status: RequestStatus,
    ) -> Result<Option<ReviewRequest>, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewRequest>(
            r#"
            UPDATE review_requests SET status = $3, completed_at = $4
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(status.as_str())
        .bind(completed_at_for(status, Utc::now()))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn count_review_requests(&self, owner: &str, status: RequestStatus) -> Result<i64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM review_requests WHERE user_id = $1 AND status = $2")
                .bind(owner)
                .bind(status.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn list_testimonials(&self, owner: &str) -> Result<Vec<Testimonial>, RepositoryError> {
        let rows = sqlx::query_as::<_, Testimonial>(
            "SELECT * FROM testimonials WHERE user_id = $1 ORDER BY created_at DESC, seq DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_testimonial(&self, id: &str, owner: &str) -> Result<Option<Testimonial>, RepositoryError> {
        let row = sqlx::query_as::<_, Testimonial>("SELECT * FROM testimonials WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_testimonial(&self, owner: &str, input: &NewTestimonial) -> Result<Testimonial, RepositoryError> {
        let row = sqlx::query_as::<_, Testimonial>(
            r#"
            INSERT INTO testimonials
                (id, user_id, client_id, request_id, content, rating, property_type, is_public, created_at)
            SELECT $1, c.user_id, c.id, $4, $5, $6, $7, $8, $9
            FROM clients c
            WHERE c.id = $3 AND c.user_id = $2
              AND ($4::text IS NULL OR EXISTS (
                  SELECT 1 FROM review_requests r WHERE r.id = $4 AND r.user_id = $2
              ))
            RETURNING *
            "#,
        )
        .bind(new_id())
        .bind(owner)
        .bind(&input.client_id)
        .bind(&input.request_id)
        .bind(&input.content)
        .bind(input.rating)
        .bind(&input.property_type)
        .bind(input.is_public)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(row),
            // Nothing inserted: report which reference failed
            None if !self.client_exists(&input.client_id, owner).await? => Err(RepositoryError::unknown_client()),
            None => Err(RepositoryError::unknown_request()),
        }
    }

    async fn rating_summary(&self, owner: &str) -> Result<RatingSummary, RepositoryError> {
        let (count, sum): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(rating), 0)::BIGINT FROM testimonials WHERE user_id = $1",
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;
        Ok(RatingSummary { count, sum })
    }
}
