use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::error::ServerError;
use crate::state::AppState;

/// The verified caller, available to handlers as `Extension<AuthUser>`.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: String,
}

/// Require `Authorization: Bearer <token>` and bind the verified user id to
/// the request.
///
/// Every failure (missing header, other scheme, empty token, verifier
/// error) is the same 401 so callers cannot tell them apart.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ServerError> {
    let token = bearer_token(&req)
        .map(str::to_owned)
        .ok_or(ServerError::Unauthorized)?;

    let user_id = state.verifier.verify(&token).await.map_err(|e| {
        debug!(error = %e, "bearer token rejected");
        ServerError::Unauthorized
    })?;

    req.extensions_mut().insert(AuthUser { user_id });
    Ok(next.run(req).await)
}

// The scheme name is case-insensitive (RFC 7235).
fn bearer_token(req: &Request<Body>) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
