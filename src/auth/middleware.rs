use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::AppError;
use crate::state::AppState;

/// Per-route auth guard.
///
/// Extracts the bearer credential from the `Authorization` header, verifies
/// it with the configured [`TokenVerifier`], and stashes the resulting
/// [`AuthenticatedUser`] in the request extensions for handlers that want it.
/// Any failure short-circuits as a 401.
///
/// [`TokenVerifier`]: crate::auth::verifier::TokenVerifier
/// [`AuthenticatedUser`]: crate::auth::models::AuthenticatedUser
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::Auth("Missing bearer token".into()))?;

    let user = state.verifier.verify_id_token(&token).await?;
    tracing::debug!(email = %user.email, "authenticated request");

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// The credential is the second whitespace-separated token of the header
/// value, i.e. the part after the `Bearer` scheme.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    value.split_whitespace().nth(1).map(str::to_string)
}
