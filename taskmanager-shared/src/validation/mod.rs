/// Request validation
///
/// Validators are pure functions from a request payload to a
/// [`ValidationResult`]. Every rule is evaluated in a fixed order and each
/// failing rule appends its message, so a single response can report several
/// problems at once.
///
/// # Modules
///
/// - [`task`]: Task create/update payloads
/// - [`user`]: Registration and login payloads
///
/// # Example
///
/// ```
/// use taskmanager_shared::models::task::RawPriority;
/// use taskmanager_shared::validation::task::{validate_create_task, CreateTaskRequest};
///
/// let request = CreateTaskRequest {
///     name: "Lorem".to_string(),
///     priority: Some(RawPriority::Name("high".to_string())),
///     description: None,
///     due_date: None,
/// };
///
/// let result = validate_create_task(&request);
/// assert!(!result.validated);
/// assert_eq!(result.message, "for priority high due date is required");
/// ```

use serde::Serialize;

pub mod task;
pub mod user;

/// Outcome of validating one payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub validated: bool,

    /// Failure reasons joined by `", "` in evaluation order
    pub message: String,
}

impl ValidationResult {
    /// A result with no failures
    pub fn passed() -> Self {
        Self {
            validated: true,
            message: String::new(),
        }
    }

    /// Records a failing rule
    pub fn set_failed(&mut self, message: &str) {
        self.validated = false;
        if !self.message.is_empty() {
            self.message.push_str(", ");
        }
        self.message.push_str(message);
    }

    /// Records a failing rule when `failed` is true
    pub fn check(&mut self, failed: bool, message: &str) -> &mut Self {
        if failed {
            self.set_failed(message);
        }
        self
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::passed()
    }
}

/// Length in characters, not bytes
pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}
