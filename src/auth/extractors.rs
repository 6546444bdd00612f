use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Resolves `Authorization: Bearer <token>` to the id of the token's owner.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".into()))?;

        match state.users.find_by_token(token).await? {
            Some(user_id) => Ok(AuthUser(user_id)),
            None => {
                warn!("unknown bearer token");
                Err(AppError::Unauthorized("Invalid token".into()))
            }
        }
    }
}
