use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ERROR_TASK_ID_MISSING: &str = "No Task ID provided";
pub const ERROR_TASK_NOT_FOUND: &str = "Task not found";
pub const ERROR_UNKNOWN_OPERATION: &str = "Unknown task event";

/// Field names a stored task record may carry. Update payloads are validated
/// against this set before any expression is built.
pub const TASK_FIELDS: [&str; 5] = ["id", "title", "description", "status", "due_date"];

/// A task as it round-trips through the store: a flat mapping of field name
/// to scalar value.
pub type TaskRecord = Map<String, Value>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    ToDo,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "TO_DO",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    pub title: Option<String>,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: Option<String>,
}

/// The nested `input` mapping of a createTask mutation. Every field is
/// optional; unknown keys (including a caller-supplied `id`) are ignored.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CreateTaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<String>,
}

impl Task {
    pub fn create(id: String, input: CreateTaskInput) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description.unwrap_or_default(),
            status: input.status.unwrap_or_default(),
            due_date: input.due_date,
        }
    }

    /// Flatten into the stored record shape. Absent optional fields become
    /// explicit nulls so the written item always carries the full field set.
    pub fn into_record(self) -> TaskRecord {
        let mut record = TaskRecord::new();
        record.insert("id".to_string(), Value::String(self.id));
        record.insert(
            "title".to_string(),
            self.title.map(Value::String).unwrap_or(Value::Null),
        );
        record.insert("description".to_string(), Value::String(self.description));
        record.insert(
            "status".to_string(),
            Value::String(self.status.as_str().to_string()),
        );
        record.insert(
            "due_date".to_string(),
            self.due_date.map(Value::String).unwrap_or(Value::Null),
        );
        record
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskEnvelope {
    pub task: Option<TaskRecord>,
    pub error: Option<ErrorDetail>,
}

impl TaskEnvelope {
    pub fn ok(task: TaskRecord) -> Self {
        Self {
            task: Some(task),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            task: None,
            error: Some(ErrorDetail {
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskListEnvelope {
    pub tasks: Option<Vec<TaskRecord>>,
    #[serde(rename = "nextToken")]
    pub next_token: Option<String>,
    pub error: Option<ErrorDetail>,
}

impl TaskListEnvelope {
    pub fn page(tasks: Vec<TaskRecord>, next_token: Option<String>) -> Self {
        Self {
            tasks: Some(tasks),
            next_token,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            tasks: None,
            next_token: None,
            error: Some(ErrorDetail {
                message: message.into(),
            }),
        }
    }
}

/// Top-level response returned to the gateway: single-task shaped for
/// create/retrieve/update/delete/unknown, list shaped for listTasks.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    Task(TaskEnvelope),
    TaskList(TaskListEnvelope),
}

impl ResponseEnvelope {
    pub fn has_error(&self) -> bool {
        match self {
            Self::Task(envelope) => envelope.error.is_some(),
            Self::TaskList(envelope) => envelope.error.is_some(),
        }
    }
}

impl From<TaskEnvelope> for ResponseEnvelope {
    fn from(envelope: TaskEnvelope) -> Self {
        Self::Task(envelope)
    }
}

impl From<TaskListEnvelope> for ResponseEnvelope {
    fn from(envelope: TaskListEnvelope) -> Self {
        Self::TaskList(envelope)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Reject update payloads carrying field names outside the task schema.
/// `id` is a member of the set here; the expression builder strips it later.
pub fn validate_update_attributes(fields: &TaskRecord) -> Result<(), ValidationError> {
    let invalid: Vec<&str> = fields
        .keys()
        .map(String::as_str)
        .filter(|key| !TASK_FIELDS.contains(key))
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(format!(
            "Invalid attributes: {invalid:?}"
        )))
    }
}
