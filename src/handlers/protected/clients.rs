use axum::extract::Path;

use crate::database::models::Client;
use crate::database::TenantRepository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::validation;

const NOT_FOUND: &str = "Client not found";

/// GET /api/clients
pub async fn list(tenant: TenantRepository) -> ApiResult<Vec<Client>> {
    Ok(ApiResponse::success(tenant.clients().list().await?))
}

/// GET /api/clients/:id
pub async fn get(tenant: TenantRepository, Path(id): Path<String>) -> ApiResult<Client> {
    let client = tenant
        .clients()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    Ok(ApiResponse::success(client))
}

/// POST /api/clients
pub async fn create(tenant: TenantRepository, JsonBody(body): JsonBody) -> ApiResult<Client> {
    let input = validation::new_client(&body)?;
    let client = tenant.clients().create(&input).await?;
    tracing::info!("Client {} created by {}", client.id, tenant.owner().id);
    Ok(ApiResponse::created(client))
}

/// PUT /api/clients/:id - partial update
pub async fn update(
    tenant: TenantRepository,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> ApiResult<Client> {
    let patch = validation::client_patch(&body)?;
    let client = tenant
        .clients()
        .update(&id, &patch)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    Ok(ApiResponse::success(client))
}

/// DELETE /api/clients/:id
pub async fn delete(tenant: TenantRepository, Path(id): Path<String>) -> ApiResult<()> {
    if !tenant.clients().delete(&id).await? {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    tracing::info!("Client {} deleted by {}", id, tenant.owner().id);
    Ok(ApiResponse::<()>::no_content())
}
