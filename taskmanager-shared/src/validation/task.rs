/// Task payload validation
///
/// Create and update payloads share one rule set, evaluated in this order:
///
/// 1. Trimmed name length within 3..=64
/// 2. Priority present and one of low, medium, high
/// 3. High priority requires a due date
/// 4. Description (untrimmed) at most 255 characters

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{char_len, ValidationResult};
use crate::models::task::{InvalidPriority, NewTask, Priority, RawPriority, UpdateTask};

pub const NAME_LENGTH_MESSAGE: &str = "name must be between 3 and 64 characters";
pub const INVALID_PRIORITY_MESSAGE: &str = "invalid priority value";
pub const DUE_DATE_REQUIRED_MESSAGE: &str = "for priority high due date is required";
pub const DESCRIPTION_TOO_LONG_MESSAGE: &str = "description too long";

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 64;
const DESCRIPTION_MAX: usize = 255;

/// Body of `POST /tasks`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub priority: Option<RawPriority>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Converts a validated request into a service input
    ///
    /// # Errors
    ///
    /// Returns `InvalidPriority` if the priority is missing or unknown, which
    /// cannot happen after a passing validation.
    pub fn to_new_task(&self) -> Result<NewTask, InvalidPriority> {
        Ok(NewTask {
            name: self.name.clone(),
            priority: resolve_priority(self.priority.as_ref())?,
            description: self.description.clone(),
            due_date: self.due_date,
        })
    }
}

/// Body of `PATCH /tasks/:task_id`
///
/// Every field replaces the stored value. Omitting `description` or
/// `due_date` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub priority: Option<RawPriority>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

impl UpdateTaskRequest {
    /// Converts a validated request into an update for the given task
    ///
    /// # Errors
    ///
    /// Returns `InvalidPriority` if the priority is missing or unknown.
    pub fn to_update_task(&self, task_id: i64) -> Result<UpdateTask, InvalidPriority> {
        Ok(UpdateTask {
            id: task_id,
            name: self.name.clone(),
            priority: resolve_priority(self.priority.as_ref())?,
            description: self.description.clone(),
            due_date: self.due_date,
        })
    }
}

fn resolve_priority(raw: Option<&RawPriority>) -> Result<Priority, InvalidPriority> {
    raw.ok_or_else(|| InvalidPriority("missing".to_string()))?
        .resolve()
}

/// Validates a task creation payload
pub fn validate_create_task(request: &CreateTaskRequest) -> ValidationResult {
    validate_task_fields(
        &request.name,
        request.priority.as_ref(),
        request.description.as_deref(),
        request.due_date.as_ref(),
    )
}

/// Validates a task update payload
pub fn validate_update_task(request: &UpdateTaskRequest) -> ValidationResult {
    validate_task_fields(
        &request.name,
        request.priority.as_ref(),
        request.description.as_deref(),
        request.due_date.as_ref(),
    )
}

fn validate_task_fields(
    name: &str,
    priority: Option<&RawPriority>,
    description: Option<&str>,
    due_date: Option<&DateTime<Utc>>,
) -> ValidationResult {
    let mut result = ValidationResult::passed();

    let name_len = char_len(name.trim());
    result.check(!(NAME_MIN..=NAME_MAX).contains(&name_len), NAME_LENGTH_MESSAGE);

    let priority = resolve_priority(priority).ok();
    result.check(priority.is_none(), INVALID_PRIORITY_MESSAGE);
    result.check(
        priority == Some(Priority::High) && due_date.is_none(),
        DUE_DATE_REQUIRED_MESSAGE,
    );

    let description_len = description.map(char_len).unwrap_or(0);
    result.check(description_len > DESCRIPTION_MAX, DESCRIPTION_TOO_LONG_MESSAGE);

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, priority: RawPriority) -> CreateTaskRequest {
        CreateTaskRequest {
            name: name.to_string(),
            priority: Some(priority),
            description: None,
            due_date: None,
        }
    }

    fn named(priority: &str) -> RawPriority {
        RawPriority::Name(priority.to_string())
    }

    #[test]
    fn test_valid_task_passes() {
        let mut task = request("Lorem Ipsum", named("medium"));
        task.description = Some("Dolor sit amet".to_string());

        let result = validate_create_task(&task);
        assert!(result.validated);
        assert!(result.message.is_empty());
    }

    #[test]
    fn test_high_priority_without_due_date() {
        let result = validate_create_task(&request("Lorem", named("high")));

        assert!(!result.validated);
        assert_eq!(result.message, DUE_DATE_REQUIRED_MESSAGE);
    }

    #[test]
    fn test_high_priority_with_due_date_passes() {
        let mut task = request("Lorem", RawPriority::Level(2));
        task.due_date = Some(Utc::now());

        assert!(validate_create_task(&task).validated);
    }

    #[test]
    fn test_due_date_message_present_with_other_failures() {
        let mut task = request("Lo", named("HIGH"));
        task.description = Some("x".repeat(300));

        let result = validate_create_task(&task);
        assert!(!result.validated);
        assert!(result.message.contains(DUE_DATE_REQUIRED_MESSAGE));
    }

    #[test]
    fn test_name_bounds_use_trimmed_length() {
        assert!(validate_create_task(&request("abc", named("low"))).validated);
        assert!(validate_create_task(&request(&"a".repeat(64), named("low"))).validated);

        for name in ["", "ab", "   ab   ", &"a".repeat(65)] {
            let result = validate_create_task(&request(name, named("low")));
            assert!(!result.validated, "name {:?} should fail", name);
            assert_eq!(result.message, NAME_LENGTH_MESSAGE);
        }
    }

    #[test]
    fn test_invalid_priority_values() {
        for priority in [named("urgent"), RawPriority::Level(3), RawPriority::Level(-1)] {
            let result = validate_create_task(&request("Lorem", priority));
            assert!(!result.validated);
            assert_eq!(result.message, INVALID_PRIORITY_MESSAGE);
        }

        let mut missing = request("Lorem", named("low"));
        missing.priority = None;
        assert_eq!(validate_create_task(&missing).message, INVALID_PRIORITY_MESSAGE);
    }

    #[test]
    fn test_description_length_is_not_trimmed() {
        let mut task = request("Lorem", named("low"));
        task.description = Some(format!("{}  ", "x".repeat(254)));

        let result = validate_create_task(&task);
        assert!(!result.validated);
        assert_eq!(result.message, DESCRIPTION_TOO_LONG_MESSAGE);

        task.description = Some("x".repeat(255));
        assert!(validate_create_task(&task).validated);
    }

    #[test]
    fn test_messages_accumulate_in_rule_order() {
        let task = CreateTaskRequest {
            name: "x".to_string(),
            priority: Some(named("lorem")),
            description: Some("d".repeat(256)),
            due_date: None,
        };

        let result = validate_create_task(&task);
        assert_eq!(
            result.message,
            "name must be between 3 and 64 characters, invalid priority value, description too long"
        );
    }

    #[test]
    fn test_update_shares_rules() {
        let update = UpdateTaskRequest {
            name: "Lorem".to_string(),
            priority: Some(named("high")),
            description: None,
            due_date: None,
        };

        let result = validate_update_task(&update);
        assert!(!result.validated);
        assert_eq!(result.message, DUE_DATE_REQUIRED_MESSAGE);
    }

    #[test]
    fn test_request_decoding_accepts_levels_and_names() {
        let request: CreateTaskRequest =
            serde_json::from_str(r#"{"name":"Lorem","priority":1}"#).unwrap();
        assert_eq!(request.to_new_task().unwrap().priority, Priority::Medium);

        let request: UpdateTaskRequest = serde_json::from_str(
            r#"{"name":"Lorem","priority":"High","due_date":"2030-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        let update = request.to_update_task(9).unwrap();
        assert_eq!(update.id, 9);
        assert_eq!(update.priority, Priority::High);
        assert!(update.due_date.is_some());
    }

    #[test]
    fn test_missing_fields_decode_to_validation_failures() {
        let request: CreateTaskRequest = serde_json::from_str("{}").unwrap();

        let result = validate_create_task(&request);
        assert_eq!(
            result.message,
            "name must be between 3 and 64 characters, invalid priority value"
        );
        assert!(request.to_new_task().is_err());
    }
}
