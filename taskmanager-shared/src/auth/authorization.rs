/// Resource ownership checks
///
/// Every task has exactly one owner, recorded in `created_by`. Handlers that
/// already hold the row compare owners with [`require_ownership`]; paths that
/// only hold an id ask the repository through `TaskService::is_task_owner`.

use super::middleware::AuthContext;

/// Error type for authorization checks
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    #[error("user not authorized for this action")]
    NotAuthorized,
}

/// Returns true if the caller owns a resource
pub fn is_owner(auth: &AuthContext, owner_id: i64) -> bool {
    auth.user_id == owner_id
}

/// Fails unless the caller owns a resource
///
/// # Errors
///
/// Returns `AuthzError::NotAuthorized` if `owner_id` is someone else
///
/// # Example
///
/// ```
/// use taskmanager_shared::auth::authorization::require_ownership;
/// use taskmanager_shared::auth::middleware::AuthContext;
///
/// let auth = AuthContext { user_id: 1, email: "lorem@ipsum.com".to_string() };
/// assert!(require_ownership(&auth, 1).is_ok());
/// assert!(require_ownership(&auth, 2).is_err());
/// ```
pub fn require_ownership(auth: &AuthContext, owner_id: i64) -> Result<(), AuthzError> {
    if is_owner(auth, owner_id) {
        Ok(())
    } else {
        tracing::debug!(user_id = auth.user_id, owner_id, "Ownership check failed");
        Err(AuthzError::NotAuthorized)
    }
}
