/// Task service backed by a `TaskRepository`

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{ServiceError, TaskService};
use crate::models::task::{NewTask, Task, UpdateTask};
use crate::repository::TaskRepository;

pub struct DefaultTaskService {
    repo: Arc<dyn TaskRepository>,
}

impl DefaultTaskService {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl TaskService for DefaultTaskService {
    async fn get_tasks_list(&self, user_id: i64) -> Result<Vec<Task>, ServiceError> {
        const OP: &str = "get_tasks_list";

        if user_id < 1 {
            return Err(ServiceError::InvalidUser { op: OP, user_id });
        }

        self.repo
            .index(user_id)
            .await
            .map_err(ServiceError::repository(OP))
    }

    async fn store_task(&self, caller_id: i64, task: NewTask) -> Result<Task, ServiceError> {
        const OP: &str = "store_task";

        if caller_id < 1 {
            return Err(ServiceError::MissingIdentity { op: OP });
        }

        self.repo
            .store(caller_id, task)
            .await
            .map_err(ServiceError::repository(OP))
    }

    #[instrument(skip(self, update), fields(task_id = update.id))]
    async fn update_task(&self, caller_id: i64, update: UpdateTask) -> Result<Task, ServiceError> {
        self.repo
            .update(caller_id, update)
            .await
            .map_err(ServiceError::repository("update_task"))
    }

    async fn show_task(&self, id: i64) -> Result<Task, ServiceError> {
        self.repo
            .show(id)
            .await
            .map_err(ServiceError::repository("show_task"))
    }

    async fn delete_task(&self, id: i64, caller_id: i64) -> Result<(), ServiceError> {
        const OP: &str = "delete_task";

        if !self.is_task_owner(caller_id, id).await? {
            debug!(task_id = id, user_id = caller_id, "Delete rejected, not owner");
            return Err(ServiceError::Unauthorized { op: OP });
        }

        self.repo
            .delete(id)
            .await
            .map_err(ServiceError::repository(OP))
    }

    async fn is_task_owner(&self, user_id: i64, id: i64) -> Result<bool, ServiceError> {
        self.repo
            .is_task_owner(user_id, id)
            .await
            .map_err(ServiceError::repository("is_task_owner"))
    }
}
