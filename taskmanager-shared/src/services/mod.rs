/// Business rules
///
/// Services sequence repository calls and enforce the rules that do not
/// depend on payload shape: identity presence, ownership before delete,
/// unique emails and credential checks. The caller's identity is always an
/// explicit argument.
///
/// # Example
///
/// ```no_run
/// use taskmanager_shared::auth::jwt::TokenService;
/// use taskmanager_shared::repository::Repositories;
/// use taskmanager_shared::services::Services;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let services = Services::new(
///     Repositories::postgres(pool),
///     TokenService::new("a-secret-key-that-is-at-least-32-bytes"),
/// );
///
/// let tasks = services.tasks.get_tasks_list(1).await?;
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::jwt::TokenService;
use crate::auth::password::PasswordError;
use crate::models::task::{NewTask, Task, UpdateTask};
use crate::models::user::User;
use crate::repository::{Repositories, RepositoryError};

pub mod task;
pub mod user;

pub use task::DefaultTaskService;
pub use user::DefaultUserService;

/// Error type for service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{op}: invalid user id {user_id}")]
    InvalidUser { op: &'static str, user_id: i64 },

    /// No authenticated identity was supplied
    #[error("{op}: missing identity")]
    MissingIdentity { op: &'static str },

    #[error("{op}: user not authorized for this action")]
    Unauthorized { op: &'static str },

    #[error("{op}: email already registered")]
    EmailTaken { op: &'static str },

    /// Unknown email or wrong password; deliberately indistinguishable
    #[error("{op}: invalid credentials")]
    InvalidCredentials { op: &'static str },

    #[error("{op}: {source}")]
    Repository {
        op: &'static str,
        #[source]
        source: RepositoryError,
    },

    #[error("{op}: {source}")]
    Password {
        op: &'static str,
        #[source]
        source: PasswordError,
    },
}

impl ServiceError {
    pub(crate) fn repository(op: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |source| ServiceError::Repository { op, source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Repository { source, .. } if source.is_not_found())
    }

    pub fn is_unauthorized(&self) -> bool {
        match self {
            ServiceError::Unauthorized { .. } => true,
            ServiceError::Repository { source, .. } => source.is_unauthorized(),
            _ => false,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            ServiceError::EmailTaken { .. }
                | ServiceError::Repository {
                    source: RepositoryError::DuplicateEmail { .. },
                    ..
                }
        )
    }
}

/// Registration input with the plaintext password
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Task business rules
#[async_trait]
pub trait TaskService: Send + Sync {
    /// Lists the caller's tasks
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidUser` if `user_id < 1`
    async fn get_tasks_list(&self, user_id: i64) -> Result<Vec<Task>, ServiceError>;

    /// Stores a task owned by the caller
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::MissingIdentity` if `caller_id < 1`
    async fn store_task(&self, caller_id: i64, task: NewTask) -> Result<Task, ServiceError>;

    /// Updates a task under a row lock
    async fn update_task(&self, caller_id: i64, update: UpdateTask) -> Result<Task, ServiceError>;

    /// Loads a task; the caller decides whether the requester may see it
    async fn show_task(&self, id: i64) -> Result<Task, ServiceError>;

    /// Deletes a task after confirming the caller owns it
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Unauthorized` if the caller does not own the task
    /// or it does not exist. Nothing is deleted in that case.
    async fn delete_task(&self, id: i64, caller_id: i64) -> Result<(), ServiceError>;

    async fn is_task_owner(&self, user_id: i64, id: i64) -> Result<bool, ServiceError>;
}

/// Account business rules
#[async_trait]
pub trait UserService: Send + Sync {
    /// Hashes the password and creates the account
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::EmailTaken` if the email is registered
    async fn register(&self, user: RegisterUser) -> Result<User, ServiceError>;

    /// Checks credentials and returns the account
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidCredentials` for an unknown email or a
    /// wrong password
    async fn login(&self, email: &str, password: &str) -> Result<User, ServiceError>;

    async fn email_exists(&self, email: &str) -> Result<bool, ServiceError>;
}

/// Everything the HTTP layer needs, cheap to clone
#[derive(Clone)]
pub struct Services {
    pub users: Arc<dyn UserService>,
    pub tasks: Arc<dyn TaskService>,
    pub tokens: TokenService,
}

impl Services {
    pub fn new(repos: Repositories, tokens: TokenService) -> Self {
        Self {
            users: Arc::new(DefaultUserService::new(repos.users)),
            tasks: Arc::new(DefaultTaskService::new(repos.tasks)),
            tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let not_found = ServiceError::repository("update_task")(RepositoryError::NotFound {
            op: "update",
            id: 4,
        });
        assert!(not_found.is_not_found());
        assert!(!not_found.is_unauthorized());
        assert_eq!(not_found.to_string(), "update_task: update: task 4 not found");

        let unauthorized =
            ServiceError::repository("update_task")(RepositoryError::Unauthorized { op: "update" });
        assert!(unauthorized.is_unauthorized());

        let duplicate =
            ServiceError::repository("register")(RepositoryError::DuplicateEmail { op: "create_user" });
        assert!(duplicate.is_conflict());
        assert!(ServiceError::EmailTaken { op: "register" }.is_conflict());
    }
}
