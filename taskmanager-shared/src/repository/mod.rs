/// Persistence layer
///
/// Repositories run parametrized SQL and own transaction boundaries. Each one
/// sits behind a trait so the service layer can be exercised against
/// in-memory doubles.
///
/// # Error messages
///
/// Every error carries the name of the repository operation that produced
/// it, e.g. `update: failed to get task from db: ...`.
///
/// # Example
///
/// ```no_run
/// use taskmanager_shared::repository::Repositories;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let repos = Repositories::postgres(pool);
/// let tasks = repos.tasks.index(1).await?;
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::task::{NewTask, Task, UpdateTask};
use crate::models::user::{CreateUser, User};

pub mod task;
pub mod user;

#[cfg(test)]
pub(crate) mod memory;

pub use task::PgTaskRepository;
pub use user::PgUserRepository;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{op}: task {id} not found")]
    NotFound { op: &'static str, id: i64 },

    /// Caller does not own the row it tried to modify
    #[error("{op}: user not authorized for this action")]
    Unauthorized { op: &'static str },

    #[error("{op}: email already registered")]
    DuplicateEmail { op: &'static str },

    #[error("{op}: {source}")]
    Database {
        op: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl RepositoryError {
    /// Wraps a driver error with the operation name
    pub(crate) fn database(op: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| RepositoryError::Database { op, source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, RepositoryError::Unauthorized { .. })
    }
}

/// User persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DuplicateEmail` if the email is taken
    async fn create_user(&self, user: CreateUser) -> Result<User, RepositoryError>;

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
}

/// Task persistence
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts a task owned by `owner_id` inside a transaction
    async fn store(&self, owner_id: i64, task: NewTask) -> Result<Task, RepositoryError>;

    /// Locks, merges, checks ownership and writes a task in one transaction
    ///
    /// Returns the merged row without re-reading it.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::NotFound` if the task does not exist
    /// - `RepositoryError::Unauthorized` if `caller_id` is not the owner
    async fn update(&self, caller_id: i64, update: UpdateTask) -> Result<Task, RepositoryError>;

    /// Loads a task regardless of owner
    async fn show(&self, id: i64) -> Result<Task, RepositoryError>;

    /// Lists a user's tasks ordered by id
    async fn index(&self, owner_id: i64) -> Result<Vec<Task>, RepositoryError>;

    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// Returns false for missing tasks as well as foreign ones
    async fn is_task_owner(&self, user_id: i64, id: i64) -> Result<bool, RepositoryError>;
}

/// The repositories a service layer is built from
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub tasks: Arc<dyn TaskRepository>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            tasks: Arc::new(PgTaskRepository::new(pool)),
        }
    }
}
