use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::Principal;
use crate::error::ApiError;
use crate::state::AppState;

/// Authentication stage: runs the configured `AuthChain` and injects the
/// resulting `Principal` into the request extensions.
///
/// Public paths and deployments with authentication disabled get an
/// anonymous principal so downstream handlers can always extract one.
pub async fn authenticate(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let security = &state.config.security;
    let path = request.uri().path().to_string();

    let principal = if !security.auth_enabled || state.config.is_public_path(&path) {
        Principal::anonymous()
    } else {
        state.auth.authenticate(&headers).await.map_err(|e| {
            tracing::warn!(path = %path, "Rejected unauthenticated request: {}", e);
            ApiError::from(e)
        })?
    };

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
