use serde_json::Value;
use task_api_core::contract::TaskRecord;
use task_api_core::update_expression::UpdateExpression;

/// One page of a table scan. `last_evaluated_key` is the store's opaque
/// cursor, present when more pages remain.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanPage {
    pub items: Vec<TaskRecord>,
    pub last_evaluated_key: Option<Value>,
}

/// Thin seam over the key-value store's single-table API. Every call is one
/// synchronous round trip; failures surface as formatted messages for the
/// calling processor's error boundary.
pub trait RecordStore {
    fn get_item(&self, id: &str) -> Result<Option<TaskRecord>, String>;

    fn put_item(&self, record: &TaskRecord) -> Result<(), String>;

    /// Apply a partial update and return the post-update record.
    fn update_item(&self, id: &str, update: &UpdateExpression) -> Result<TaskRecord, String>;

    /// Remove a record and return its prior state, if it existed.
    fn delete_item(&self, id: &str) -> Result<Option<TaskRecord>, String>;

    fn scan(&self, limit: i32, exclusive_start_key: Option<&Value>) -> Result<ScanPage, String>;
}
