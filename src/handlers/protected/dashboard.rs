use crate::database::TenantRepository;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::dashboard_service::{self, DashboardStats};

/// GET /api/dashboard/stats
pub async fn stats(tenant: TenantRepository) -> ApiResult<DashboardStats> {
    Ok(ApiResponse::success(dashboard_service::compute_stats(&tenant).await?))
}
