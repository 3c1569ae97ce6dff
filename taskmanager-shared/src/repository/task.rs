/// PostgreSQL task repository
///
/// # Concurrent updates
///
/// `update` loads the row with `SELECT ... FOR UPDATE` before checking the
/// owner, so concurrent updaters of one task queue on the row lock instead of
/// racing. The lock is held until the transaction commits or rolls back;
/// dropping the future mid-flight drops the transaction, which rolls back.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use super::{RepositoryError, TaskRepository};
use crate::models::task::{NewTask, Task, UpdateTask};

const TASK_COLUMNS: &str = "id, name, priority, description, due_date, created_at, created_by";

#[derive(Debug, Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Rolls back and hands the error back to the caller
async fn abort(
    tx: Transaction<'_, Postgres>,
    op: &'static str,
    err: RepositoryError,
) -> RepositoryError {
    if let Err(rollback_err) = tx.rollback().await {
        tracing::warn!(op, error = %rollback_err, "Rollback failed");
    }
    err
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn store(&self, owner_id: i64, task: NewTask) -> Result<Task, RepositoryError> {
        const OP: &str = "store";

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(RepositoryError::database(OP))?;

        let inserted = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (name, priority, description, due_date, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(&task.name)
        .bind(task.priority)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await;

        let inserted = match inserted {
            Ok(row) => row,
            Err(e) => return Err(abort(tx, OP, RepositoryError::database(OP)(e)).await),
        };

        tx.commit().await.map_err(RepositoryError::database(OP))?;

        debug!(task_id = inserted.id, user_id = owner_id, "Task stored");
        Ok(inserted)
    }

    async fn update(&self, caller_id: i64, update: UpdateTask) -> Result<Task, RepositoryError> {
        const OP: &str = "update";

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(RepositoryError::database(OP))?;

        let locked = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 FOR UPDATE"
        ))
        .bind(update.id)
        .fetch_optional(&mut *tx)
        .await;

        let mut task = match locked {
            Ok(Some(task)) => task,
            Ok(None) => {
                let err = RepositoryError::NotFound { op: OP, id: update.id };
                return Err(abort(tx, OP, err).await);
            }
            Err(e) => {
                let err = RepositoryError::Database {
                    op: "update: failed to get task from db",
                    source: e,
                };
                return Err(abort(tx, OP, err).await);
            }
        };

        update.apply_to(&mut task);

        if task.created_by != caller_id {
            debug!(task_id = task.id, user_id = caller_id, "Update rejected, not owner");
            return Err(abort(tx, OP, RepositoryError::Unauthorized { op: OP }).await);
        }

        let written = sqlx::query(
            "UPDATE tasks
             SET name = $1, priority = $2, description = $3, due_date = $4
             WHERE id = $5",
        )
        .bind(&task.name)
        .bind(task.priority)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(task.id)
        .execute(&mut *tx)
        .await;

        if let Err(e) = written {
            return Err(abort(tx, OP, RepositoryError::database(OP)(e)).await);
        }

        tx.commit().await.map_err(RepositoryError::database(OP))?;

        debug!(task_id = task.id, user_id = caller_id, "Task updated");
        Ok(task)
    }

    async fn show(&self, id: i64) -> Result<Task, RepositoryError> {
        const OP: &str = "show";

        sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::database(OP))?
            .ok_or(RepositoryError::NotFound { op: OP, id })
    }

    async fn index(&self, owner_id: i64) -> Result<Vec<Task>, RepositoryError> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE created_by = $1 ORDER BY id"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::database("index"))
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::database("delete"))?;

        debug!(task_id = id, rows = result.rows_affected(), "Task deleted");
        Ok(())
    }

    async fn is_task_owner(&self, user_id: i64, id: i64) -> Result<bool, RepositoryError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = $1 AND created_by = $2)",
        )
        .bind(id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::database("is_task_owner"))
    }
}
