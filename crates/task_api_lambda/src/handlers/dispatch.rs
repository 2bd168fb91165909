//! Event dispatch: payload parsing, operation resolution, and the top-level
//! handler invoked by the Lambda binary.

use serde_json::{json, Map, Value};

use task_api_core::contract::ResponseEnvelope;

use crate::adapters::record_store::RecordStore;
use crate::handlers::processors::{create, delete, list, retrieve, unknown, update};

/// The fixed operation set, resolved by exact match on the gateway's
/// `fieldName`. Anything else falls back to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateTask,
    UpdateTask,
    DeleteTask,
    GetTask,
    ListTasks,
    Unknown,
}

impl Operation {
    pub fn from_field_name(field: Option<&str>) -> Self {
        match field {
            Some("createTask") => Self::CreateTask,
            Some("updateTask") => Self::UpdateTask,
            Some("deleteTask") => Self::DeleteTask,
            Some("getTask") => Self::GetTask,
            Some("listTasks") => Self::ListTasks,
            _ => Self::Unknown,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::CreateTask => "createTask",
            Self::UpdateTask => "updateTask",
            Self::DeleteTask => "deleteTask",
            Self::GetTask => "getTask",
            Self::ListTasks => "listTasks",
            Self::Unknown => "unknown",
        }
    }
}

/// A processor is an (extract, process) function pair; the table below is the
/// whole dispatch surface.
pub struct Processor {
    pub extract_input: fn(&Map<String, Value>) -> Map<String, Value>,
    pub process: fn(&Map<String, Value>, &dyn RecordStore) -> ResponseEnvelope,
}

pub fn processor_for(operation: Operation) -> Processor {
    match operation {
        Operation::CreateTask => Processor {
            extract_input: create::extract_input,
            process: create::process,
        },
        Operation::UpdateTask => Processor {
            extract_input: update::extract_input,
            process: update::process,
        },
        Operation::DeleteTask => Processor {
            extract_input: delete::extract_input,
            process: delete::process,
        },
        Operation::GetTask => Processor {
            extract_input: retrieve::extract_input,
            process: retrieve::process,
        },
        Operation::ListTasks => Processor {
            extract_input: list::extract_input,
            process: list::process,
        },
        Operation::Unknown => Processor {
            extract_input: unknown::extract_input,
            process: unknown::process,
        },
    }
}

/// Pull the operation name and argument mapping out of the gateway payload.
/// Absent fields degrade to `None` / an empty mapping; the extracted pair is
/// logged for diagnosis.
pub fn parse_payload(payload: &Value) -> (Option<String>, Map<String, Value>) {
    let field = payload
        .get("info")
        .and_then(|info| info.get("fieldName"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let arguments = payload
        .get("arguments")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    log_info(
        "payload_parsed",
        json!({"field": field, "arguments": arguments}),
    );
    (field, arguments)
}

/// Top-level dispatcher. Every path through here terminates in a returned
/// envelope; processors own the error boundary, so this function is total.
pub fn handle_task_event(event: &Value, store: &dyn RecordStore) -> ResponseEnvelope {
    log_info("event_received", json!({"event": event}));

    let payload = match event.get("payload") {
        Some(payload) if payload.is_object() => payload,
        _ => event,
    };
    let (field, arguments) = parse_payload(payload);
    let operation = Operation::from_field_name(field.as_deref());
    let processor = processor_for(operation);

    let input = (processor.extract_input)(&arguments);
    let response = (processor.process)(&input, store);

    let details = json!({"operation": operation.as_str(), "response": &response});
    if response.has_error() {
        log_error("response_ready", details);
    } else {
        log_info("response_ready", details);
    }
    response
}

fn log_info(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "task_handler",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_error(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "task_handler",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
