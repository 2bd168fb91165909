//! One processor per operation, each a uniform `extract_input` / `process`
//! pair. `extract_input` never fails; `process` funnels every failure through
//! a single error-to-envelope boundary, so nothing escapes a processor.

use serde_json::{Map, Value};

use task_api_core::contract::{
    validate_update_attributes, CreateTaskInput, ResponseEnvelope, Task, TaskEnvelope,
    TaskListEnvelope, TaskRecord, ERROR_TASK_ID_MISSING, ERROR_TASK_NOT_FOUND,
    ERROR_UNKNOWN_OPERATION,
};
use task_api_core::update_expression::build_update_expression;

use crate::adapters::record_store::RecordStore;

pub mod create {
    use uuid::Uuid;

    use super::*;

    /// createTask carries its fields in a nested `input` mapping.
    pub fn extract_input(arguments: &Map<String, Value>) -> Map<String, Value> {
        arguments
            .get("input")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    pub fn process(input: &Map<String, Value>, store: &dyn RecordStore) -> ResponseEnvelope {
        run(input, store).into()
    }

    fn run(input: &Map<String, Value>, store: &dyn RecordStore) -> TaskEnvelope {
        match process_inner(input, store) {
            Ok(envelope) => envelope,
            Err(message) => TaskEnvelope::error(message),
        }
    }

    fn process_inner(
        input: &Map<String, Value>,
        store: &dyn RecordStore,
    ) -> Result<TaskEnvelope, String> {
        let parsed: CreateTaskInput = serde_json::from_value(Value::Object(input.clone()))
            .map_err(|error| format!("invalid createTask input: {error}"))?;

        // A caller-supplied id was already dropped during deserialization;
        // every created task gets a fresh one.
        let record = Task::create(Uuid::new_v4().to_string(), parsed).into_record();
        store.put_item(&record)?;
        Ok(TaskEnvelope::ok(record))
    }
}

pub mod retrieve {
    use super::*;

    pub fn extract_input(arguments: &Map<String, Value>) -> Map<String, Value> {
        let mut input = Map::new();
        input.insert(
            "id".to_string(),
            arguments.get("id").cloned().unwrap_or(Value::Null),
        );
        input
    }

    pub fn process(input: &Map<String, Value>, store: &dyn RecordStore) -> ResponseEnvelope {
        run(input, store).into()
    }

    pub(super) fn run(input: &Map<String, Value>, store: &dyn RecordStore) -> TaskEnvelope {
        match process_inner(input, store) {
            Ok(envelope) => envelope,
            Err(message) => TaskEnvelope::error(message),
        }
    }

    fn process_inner(
        input: &Map<String, Value>,
        store: &dyn RecordStore,
    ) -> Result<TaskEnvelope, String> {
        let Some(task_id) = input.get("id").and_then(Value::as_str) else {
            return Ok(TaskEnvelope::error(ERROR_TASK_ID_MISSING));
        };

        match store.get_item(task_id)? {
            Some(record) => Ok(TaskEnvelope::ok(record)),
            None => Ok(TaskEnvelope::error(format!(
                "{ERROR_TASK_NOT_FOUND} for {task_id}"
            ))),
        }
    }
}

pub mod update {
    use super::*;

    /// updateTask carries its fields in a nested `input` mapping, `id`
    /// included.
    pub fn extract_input(arguments: &Map<String, Value>) -> Map<String, Value> {
        arguments
            .get("input")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    pub fn process(input: &Map<String, Value>, store: &dyn RecordStore) -> ResponseEnvelope {
        run(input, store).into()
    }

    fn run(input: &Map<String, Value>, store: &dyn RecordStore) -> TaskEnvelope {
        match process_inner(input, store) {
            Ok(envelope) => envelope,
            Err(message) => TaskEnvelope::error(message),
        }
    }

    fn process_inner(
        input: &Map<String, Value>,
        store: &dyn RecordStore,
    ) -> Result<TaskEnvelope, String> {
        let Some(task_id) = input.get("id").and_then(Value::as_str) else {
            return Ok(TaskEnvelope::error(ERROR_TASK_ID_MISSING));
        };

        if let Err(error) = validate_update_attributes(input) {
            return Ok(TaskEnvelope::error(error.message()));
        }

        // Existence check with an id-only input; a retrieve error comes back
        // to the caller unchanged and no mutation is attempted.
        let mut id_only = Map::new();
        id_only.insert("id".to_string(), Value::String(task_id.to_string()));
        let existing = super::retrieve::run(&id_only, store);
        if existing.error.is_some() {
            return Ok(existing);
        }

        let update = build_update_expression(input);
        let updated = store.update_item(task_id, &update)?;
        Ok(TaskEnvelope::ok(updated))
    }
}

pub mod delete {
    use super::*;

    pub fn extract_input(arguments: &Map<String, Value>) -> Map<String, Value> {
        let mut input = Map::new();
        input.insert(
            "id".to_string(),
            arguments.get("id").cloned().unwrap_or(Value::Null),
        );
        input
    }

    pub fn process(input: &Map<String, Value>, store: &dyn RecordStore) -> ResponseEnvelope {
        run(input, store).into()
    }

    fn run(input: &Map<String, Value>, store: &dyn RecordStore) -> TaskEnvelope {
        match process_inner(input, store) {
            Ok(envelope) => envelope,
            Err(message) => TaskEnvelope::error(message),
        }
    }

    fn process_inner(
        input: &Map<String, Value>,
        store: &dyn RecordStore,
    ) -> Result<TaskEnvelope, String> {
        let task_id = match input.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id,
            _ => return Ok(TaskEnvelope::error(ERROR_TASK_ID_MISSING)),
        };

        match store.delete_item(task_id)? {
            Some(prior) => Ok(TaskEnvelope::ok(prior)),
            None => Ok(TaskEnvelope::error(format!(
                "{ERROR_TASK_NOT_FOUND} with ID {task_id}"
            ))),
        }
    }
}

pub mod list {
    use super::*;

    const DEFAULT_LIMIT: i32 = 10;
    const PROJECTED_FIELDS: [&str; 4] = ["id", "description", "title", "status"];

    pub fn extract_input(arguments: &Map<String, Value>) -> Map<String, Value> {
        let mut input = Map::new();
        input.insert(
            "limit".to_string(),
            arguments.get("limit").cloned().unwrap_or(Value::Null),
        );
        input.insert(
            "nextToken".to_string(),
            arguments.get("nextToken").cloned().unwrap_or(Value::Null),
        );
        input
    }

    pub fn process(input: &Map<String, Value>, store: &dyn RecordStore) -> ResponseEnvelope {
        match process_inner(input, store) {
            Ok(envelope) => envelope.into(),
            Err(message) => TaskListEnvelope::error(message).into(),
        }
    }

    fn process_inner(
        input: &Map<String, Value>,
        store: &dyn RecordStore,
    ) -> Result<TaskListEnvelope, String> {
        let limit = parse_limit(input.get("limit"))?;
        let exclusive_start_key = match input.get("nextToken") {
            None | Some(Value::Null) => None,
            Some(Value::String(token)) => Some(
                serde_json::from_str::<Value>(token)
                    .map_err(|error| format!("malformed nextToken cursor: {error}"))?,
            ),
            Some(other) => return Err(format!("nextToken must be a string: {other}")),
        };

        let page = store.scan(limit, exclusive_start_key.as_ref())?;
        let next_token = page
            .last_evaluated_key
            .map(|key| {
                serde_json::to_string(&key)
                    .map_err(|error| format!("failed to serialize pagination cursor: {error}"))
            })
            .transpose()?;

        let tasks = page.items.iter().map(project_task).collect();
        Ok(TaskListEnvelope::page(tasks, next_token))
    }

    fn parse_limit(value: Option<&Value>) -> Result<i32, String> {
        match value {
            None | Some(Value::Null) => Ok(DEFAULT_LIMIT),
            Some(Value::Number(number)) => number
                .as_i64()
                .and_then(|limit| i32::try_from(limit).ok())
                .ok_or_else(|| format!("limit must be an integer: {number}")),
            Some(Value::String(text)) => text
                .trim()
                .parse::<i32>()
                .map_err(|error| format!("limit must be an integer: {error}")),
            Some(other) => Err(format!("limit must be an integer: {other}")),
        }
    }

    /// List results carry a fixed projection; due_date is intentionally
    /// dropped. `description` defaults to empty when a row lacks the field.
    fn project_task(record: &TaskRecord) -> TaskRecord {
        let mut projected = TaskRecord::new();
        for field in PROJECTED_FIELDS {
            let value = match record.get(field) {
                Some(value) => value.clone(),
                None if field == "description" => Value::String(String::new()),
                None => Value::Null,
            };
            projected.insert(field.to_string(), value);
        }
        projected
    }
}

pub mod unknown {
    use super::*;

    pub fn extract_input(_arguments: &Map<String, Value>) -> Map<String, Value> {
        Map::new()
    }

    pub fn process(_input: &Map<String, Value>, _store: &dyn RecordStore) -> ResponseEnvelope {
        TaskEnvelope::error(ERROR_UNKNOWN_OPERATION).into()
    }
}
