/// Task model
///
/// A task belongs to the user recorded in `created_by`. The owner is set once
/// on insert and never transfers.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     name TEXT NOT NULL,
///     priority task_priority NOT NULL,
///     description VARCHAR(255),
///     due_date TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     created_by BIGINT NOT NULL REFERENCES users(id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task priority
///
/// Serialized as a lowercase name. On input either a case-insensitive name
/// or an integer level (`0` low, `1` medium, `2` high) is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,

    Medium,

    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn level(&self) -> i64 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
        }
    }

    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            0 => Some(Priority::Low),
            1 => Some(Priority::Medium),
            2 => Some(Priority::High),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a priority name or level is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid priority value: {0}")]
pub struct InvalidPriority(pub String);

impl FromStr for Priority {
    type Err = InvalidPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(InvalidPriority(format!("{:?}", s))),
        }
    }
}

/// Priority as it arrived on the wire, before range checking
///
/// Request payloads keep the raw value so that an unknown priority becomes a
/// validation message instead of a decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawPriority {
    Level(i64),
    Name(String),
}

impl RawPriority {
    /// Resolves the raw value to a known priority
    pub fn resolve(&self) -> Result<Priority, InvalidPriority> {
        match self {
            RawPriority::Level(level) => {
                Priority::from_level(*level).ok_or_else(|| InvalidPriority(level.to_string()))
            }
            RawPriority::Name(name) => name.parse(),
        }
    }
}

impl From<Priority> for RawPriority {
    fn from(priority: Priority) -> Self {
        RawPriority::Name(priority.as_str().to_string())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawPriority::deserialize(deserializer)?
            .resolve()
            .map_err(de::Error::custom)
    }
}

/// Task model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: i64,

    pub name: String,

    pub priority: Priority,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub due_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    /// Owning user, immutable after insert
    pub created_by: i64,
}

/// Input for creating a new task
///
/// The owner is passed separately so it always comes from the authenticated
/// identity, never from the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub name: String,

    pub priority: Priority,

    pub description: Option<String>,

    pub due_date: Option<DateTime<Utc>>,
}

/// Input for updating a task
///
/// Every field overwrites the stored value, including `None`, which clears
/// the description or due date. `created_at` and `created_by` are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTask {
    pub id: i64,

    pub name: String,

    pub priority: Priority,

    pub description: Option<String>,

    pub due_date: Option<DateTime<Utc>>,
}

impl UpdateTask {
    /// Merges the update onto a loaded row
    pub fn apply_to(&self, task: &mut Task) {
        task.name = self.name.clone();
        task.priority = self.priority;
        task.description = self.description.clone();
        task.due_date = self.due_date;
    }
}

/// List of tasks owned by one user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            id: 7,
            name: "Lorem Ipsum".to_string(),
            priority: Priority::Low,
            description: Some("Dolor Et".to_string()),
            due_date: Some(Utc::now()),
            created_at: Utc::now(),
            created_by: 1,
        }
    }

    #[test]
    fn test_priority_from_names() {
        for (input, expected) in [
            (r#""low""#, Priority::Low),
            (r#""medium""#, Priority::Medium),
            (r#""high""#, Priority::High),
            (r#""HIGH""#, Priority::High),
        ] {
            let priority: Priority = serde_json::from_str(input).unwrap();
            assert_eq!(priority, expected, "input {}", input);
        }
    }

    #[test]
    fn test_priority_from_levels() {
        assert_eq!(serde_json::from_str::<Priority>("0").unwrap(), Priority::Low);
        assert_eq!(serde_json::from_str::<Priority>("1").unwrap(), Priority::Medium);
        assert_eq!(serde_json::from_str::<Priority>("2").unwrap(), Priority::High);
    }

    #[test]
    fn test_priority_rejects_unknown_values() {
        let err = serde_json::from_str::<Priority>(r#""lorem""#).unwrap_err();
        assert!(err.to_string().contains("invalid priority value: \"lorem\""));

        let err = serde_json::from_str::<Priority>("12").unwrap_err();
        assert!(err.to_string().contains("invalid priority value: 12"));

        let err = serde_json::from_str::<Priority>("-2").unwrap_err();
        assert!(err.to_string().contains("invalid priority value: -2"));

        assert!(serde_json::from_str::<Priority>("1.1").is_err());
        assert!(serde_json::from_str::<Priority>("lorem").is_err());
    }

    #[test]
    fn test_priority_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), r#""high""#);
        assert_eq!(Priority::Medium.to_string(), "medium");
    }

    #[test]
    fn test_raw_priority_keeps_out_of_range_values() {
        let raw: RawPriority = serde_json::from_str("5").unwrap();
        assert_eq!(raw, RawPriority::Level(5));
        assert!(raw.resolve().is_err());

        let raw: RawPriority = serde_json::from_str(r#""urgent""#).unwrap();
        assert_eq!(raw, RawPriority::Name("urgent".to_string()));
        assert!(raw.resolve().is_err());

        assert_eq!(RawPriority::from(Priority::Low).resolve(), Ok(Priority::Low));
    }

    #[test]
    fn test_update_overwrites_every_payload_field() {
        let mut task = sample_task();
        let created_at = task.created_at;

        let update = UpdateTask {
            id: task.id,
            name: "Renamed".to_string(),
            priority: Priority::Medium,
            description: None,
            due_date: None,
        };
        update.apply_to(&mut task);

        assert_eq!(task.name, "Renamed");
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.description.is_none());
        assert!(task.due_date.is_none());
        assert_eq!(task.created_at, created_at);
        assert_eq!(task.created_by, 1);
        assert_eq!(task.id, 7);
    }

    #[test]
    fn test_task_json_omits_missing_description() {
        let mut task = sample_task();
        task.description = None;

        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("description").is_none());
        assert_eq!(json["priority"], "low");
        assert_eq!(json["created_by"], 1);
    }
}
