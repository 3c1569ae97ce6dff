/// Database models for the task manager
///
/// This module contains the persisted entities and the inputs used to
/// create or modify them. SQL lives in the `repository` module.
///
/// # Models
///
/// - `user`: Registered accounts
/// - `task`: Personal tasks owned by exactly one user
///
/// # Example
///
/// ```
/// use taskmanager_shared::models::task::{NewTask, Priority};
///
/// let task = NewTask {
///     name: "Write report".to_string(),
///     priority: Priority::Medium,
///     description: None,
///     due_date: None,
/// };
/// assert_eq!(task.priority.as_str(), "medium");
/// ```

pub mod task;
pub mod user;
