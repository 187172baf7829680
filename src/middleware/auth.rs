use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{bearer_token, Identity};
use crate::database::TenantRepository;
use crate::error::ApiError;

/// Bearer-token gate for `/api/*`. Verifies the caller with the configured
/// identity verifier and attaches the resulting [`Identity`] to the request.
pub async fn require_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?;
    let identity = state.verifier.verify(token).await?;

    tracing::debug!("Authenticated {} ({})", identity.id, identity.email);
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Identity>().cloned().ok_or_else(|| {
            // Route registered outside the gate
            tracing::error!("No verified identity on {} {}", parts.method, parts.uri.path());
            ApiError::unauthorized(crate::auth::AuthError::Missing.to_string())
        })
    }
}

/// Handlers take a [`TenantRepository`] to reach storage; it is always bound
/// to the identity verified by [`require_identity`].
#[async_trait]
impl FromRequestParts<AppState> for TenantRepository {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let identity = Identity::from_request_parts(parts, state).await?;
        Ok(TenantRepository::new(state.store.clone(), identity))
    }
}
