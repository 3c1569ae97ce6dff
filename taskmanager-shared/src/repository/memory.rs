//! In-memory repositories for service unit tests

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{RepositoryError, TaskRepository, UserRepository};
use crate::models::task::{NewTask, Task, UpdateTask};
use crate::models::user::{CreateUser, User};

#[derive(Default)]
pub struct InMemoryTaskRepository {
    rows: Mutex<BTreeMap<i64, Task>>,
}

impl InMemoryTaskRepository {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, owner_id: i64, task: NewTask) -> Result<Task, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.keys().next_back().copied().unwrap_or(0) + 1;

        let row = Task {
            id,
            name: task.name,
            priority: task.priority,
            description: task.description,
            due_date: task.due_date,
            created_at: Utc::now(),
            created_by: owner_id,
        };
        rows.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, caller_id: i64, update: UpdateTask) -> Result<Task, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();

        let mut task = rows
            .get(&update.id)
            .cloned()
            .ok_or(RepositoryError::NotFound { op: "update", id: update.id })?;

        update.apply_to(&mut task);
        if task.created_by != caller_id {
            return Err(RepositoryError::Unauthorized { op: "update" });
        }

        rows.insert(task.id, task.clone());
        Ok(task)
    }

    async fn show(&self, id: i64) -> Result<Task, RepositoryError> {
        self.rows
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound { op: "show", id })
    }

    async fn index(&self, owner_id: i64) -> Result<Vec<Task>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|task| task.created_by == owner_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        self.rows.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn is_task_owner(&self, user_id: i64, id: i64) -> Result<bool, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&id)
            .is_some_and(|task| task.created_by == user_id))
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: CreateUser) -> Result<User, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|existing| existing.email == user.email) {
            return Err(RepositoryError::DuplicateEmail { op: "create_user" });
        }

        let created = User {
            id: rows.len() as i64 + 1,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        Ok(self.rows.lock().unwrap().iter().any(|user| user.email == email))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }
}
