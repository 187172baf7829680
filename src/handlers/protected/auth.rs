use crate::auth::Identity;
use crate::database::TenantRepository;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/auth/user - the verified caller. Also refreshes the local mirror
/// row so later writes can reference it.
pub async fn user(tenant: TenantRepository) -> ApiResult<Identity> {
    tenant.sync_user().await?;
    Ok(ApiResponse::success(tenant.owner().clone()))
}
