use axum::extract::Path;

use crate::database::models::Testimonial;
use crate::database::TenantRepository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::validation;

/// GET /api/testimonials
pub async fn list(tenant: TenantRepository) -> ApiResult<Vec<Testimonial>> {
    Ok(ApiResponse::success(tenant.testimonials().list().await?))
}

/// GET /api/testimonials/:id
pub async fn get(tenant: TenantRepository, Path(id): Path<String>) -> ApiResult<Testimonial> {
    let testimonial = tenant
        .testimonials()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Testimonial not found"))?;
    Ok(ApiResponse::success(testimonial))
}

/// POST /api/testimonials
pub async fn create(tenant: TenantRepository, JsonBody(body): JsonBody) -> ApiResult<Testimonial> {
    let input = validation::new_testimonial(&body)?;
    let testimonial = tenant.testimonials().create(&input).await?;
    Ok(ApiResponse::created(testimonial))
}
