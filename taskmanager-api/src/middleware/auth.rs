/// JWT authentication layer
///
/// Wraps `taskmanager_shared::auth::middleware::authenticate` for axum. On
/// success the caller's [`AuthContext`] is inserted into request extensions;
/// on failure the request never reaches the handler.

use crate::app::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use taskmanager_shared::auth::middleware::{authenticate, AuthContext, AuthError};

/// Authenticates the request or answers 401
pub async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let auth: AuthContext = authenticate(
        &state.services.tokens,
        state.services.users.as_ref(),
        auth_header,
    )
    .await
    .map_err(|e| {
        tracing::debug!(error = %e, "Authentication failed");
        e
    })?;

    tracing::Span::current().record("user_id", auth.user_id);
    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}
