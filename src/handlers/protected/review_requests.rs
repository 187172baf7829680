use axum::extract::Path;
use axum::http::StatusCode;

use crate::database::models::ReviewRequest;
use crate::database::TenantRepository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::validation;

const NOT_FOUND: &str = "Review request not found";

/// GET /api/review-requests
pub async fn list(tenant: TenantRepository) -> ApiResult<Vec<ReviewRequest>> {
    Ok(ApiResponse::success(tenant.review_requests().list().await?))
}

/// GET /api/review-requests/:id
pub async fn get(tenant: TenantRepository, Path(id): Path<String>) -> ApiResult<ReviewRequest> {
    let request = tenant
        .review_requests()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    Ok(ApiResponse::success(request))
}

/// POST /api/review-requests
pub async fn create(tenant: TenantRepository, JsonBody(body): JsonBody) -> ApiResult<ReviewRequest> {
    let input = validation::new_review_request(&body)?;
    let request = tenant.review_requests().create(&input).await?;
    tracing::info!("Review request {} sent to client {}", request.id, request.client_id);
    Ok(ApiResponse::created(request))
}

/// PUT /api/review-requests/:id/status
pub async fn update_status(
    tenant: TenantRepository,
    Path(id): Path<String>,
    body: Result<JsonBody, ApiError>,
) -> ApiResult<ReviewRequest> {
    let status = match body {
        Ok(JsonBody(body)) => validation::status_update(&body)?,
        Err(err) if err.status_code() == StatusCode::PAYLOAD_TOO_LARGE => return Err(err),
        // An unreadable body names no status either
        Err(_) => return Err(validation::invalid_status().into()),
    };
    let request = tenant
        .review_requests()
        .update_status(&id, status)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    Ok(ApiResponse::success(request))
}
