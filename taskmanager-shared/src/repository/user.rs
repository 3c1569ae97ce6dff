/// PostgreSQL user repository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{RepositoryError, UserRepository};
use crate::models::user::{CreateUser, User};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";

#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(&self, user: CreateUser) -> Result<User, RepositoryError> {
        const OP: &str = "create_user";

        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                RepositoryError::DuplicateEmail { op: OP }
            }
            other => RepositoryError::database(OP)(other),
        })?;

        debug!(user_id = created.id, "User created");
        Ok(created)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::database("email_exists"))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::database("find_by_email"))
    }
}
