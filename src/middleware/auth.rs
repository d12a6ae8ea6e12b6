use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::{error::AppError, models::User, routes::AppState};

/// Authenticated account, extracted from `Authorization: Bearer <jwt>`
///
/// Missing token → 401, bad or expired token → 403, token for an account
/// that no longer exists → 401.
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Access token required".to_string()))?;

        let claims = state.auth.verify_token(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            AppError::Forbidden("Invalid or expired token".to_string())
        })?;

        let user_id = claims
            .user_id()
            .ok_or_else(|| AppError::Forbidden("Invalid or expired token".to_string()))?;

        let user = state
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        Ok(AuthUser(user))
    }
}
