/// Request authentication
///
/// Turns the `Authorization` header of an incoming request into an
/// [`AuthContext`]. The axum layer in the API crate calls [`authenticate`]
/// and inserts the context into request extensions, where handlers pick it
/// up with `Extension<AuthContext>`.
///
/// # Steps
///
/// 1. Read the header; a missing or empty value is rejected
/// 2. Strip a leading `Bearer ` in any letter case
/// 3. Verify the token (signature, HMAC family, issuer, expiry)
/// 4. Confirm the subject email still belongs to a registered user
///
/// Every failure except a lookup error is a 401.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use taskmanager_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {} ({})", auth.user_id, auth.email)
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::jwt::{JwtError, TokenService};
use crate::services::UserService;

const BEARER_PREFIX: &str = "bearer ";

/// Identity of the authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: i64,

    pub email: String,
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),

    /// Token is valid but its subject is no longer registered
    #[error("Unknown token subject")]
    UnknownSubject,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::DatabaseError(msg) => {
                tracing::error!(error = %msg, "Authentication lookup failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AuthError::InvalidToken(JwtError::Expired) => {
                (StatusCode::UNAUTHORIZED, "Token expired".to_string())
            }
            other => (StatusCode::UNAUTHORIZED, other.to_string()),
        };

        let error = if status == StatusCode::UNAUTHORIZED {
            "unauthorized"
        } else {
            "internal_error"
        };

        (status, Json(json!({ "error": error, "message": message }))).into_response()
    }
}

/// Extracts the raw token from an `Authorization` header value
///
/// A leading `Bearer ` prefix is removed case-insensitively. Any other value
/// is taken as the token itself. A bare scheme with nothing after it counts
/// as empty.
///
/// # Errors
///
/// Returns `AuthError::MissingCredentials` if nothing is left after stripping
pub fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    let header = header.trim_start();

    if header.trim_end().eq_ignore_ascii_case(BEARER_PREFIX.trim_end()) {
        return Err(AuthError::MissingCredentials);
    }

    let token = match header.get(..BEARER_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(BEARER_PREFIX) => {
            &header[BEARER_PREFIX.len()..]
        }
        _ => header,
    };

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    Ok(token)
}

/// Authenticates a request from its `Authorization` header
///
/// # Errors
///
/// - `AuthError::MissingCredentials` if the header is absent or empty
/// - `AuthError::InvalidToken` if verification fails
/// - `AuthError::UnknownSubject` if the email is not registered
/// - `AuthError::DatabaseError` if the existence lookup fails
pub async fn authenticate(
    tokens: &TokenService,
    users: &dyn UserService,
    header: Option<&str>,
) -> Result<AuthContext, AuthError> {
    let header = header.ok_or(AuthError::MissingCredentials)?;
    let token = extract_bearer_token(header)?;

    let claims = tokens.verify(token)?;

    let exists = users
        .email_exists(&claims.sub)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

    if !exists {
        tracing::debug!(email = %claims.sub, "Token subject no longer exists");
        return Err(AuthError::UnknownSubject);
    }

    Ok(AuthContext {
        user_id: claims.user_id,
        email: claims.sub,
    })
}
