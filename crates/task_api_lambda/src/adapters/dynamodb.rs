use std::collections::HashMap;

use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use serde_json::{Map, Value};
use task_api_core::contract::TaskRecord;
use task_api_core::update_expression::UpdateExpression;

use crate::adapters::record_store::{RecordStore, ScanPage};

/// `RecordStore` implementation over a single DynamoDB table keyed by `id`.
/// The client is cheap to clone and safe to share across invocations.
pub struct DynamoRecordStore {
    table_name: String,
    client: aws_sdk_dynamodb::Client,
}

impl DynamoRecordStore {
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            client,
        }
    }
}

impl RecordStore for DynamoRecordStore {
    fn get_item(&self, id: &str) -> Result<Option<TaskRecord>, String> {
        let client = self.client.clone();
        let table_name = self.table_name.clone();
        let task_id = id.to_string();

        let output = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .get_item()
                    .table_name(table_name)
                    .key("id", AttributeValue::S(task_id))
                    .send()
                    .await
                    .map_err(|error| format!("failed to get item from dynamodb: {error}"))
            })
        })?;

        output.item().map(item_to_record).transpose()
    }

    fn put_item(&self, record: &TaskRecord) -> Result<(), String> {
        let item = record_to_item(record)?;
        let client = self.client.clone();
        let table_name = self.table_name.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .put_item()
                    .table_name(table_name)
                    .set_item(Some(item))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to put item to dynamodb: {error}"))
            })
        })
    }

    fn update_item(&self, id: &str, update: &UpdateExpression) -> Result<TaskRecord, String> {
        let names: HashMap<String, String> = update
            .names
            .iter()
            .map(|(placeholder, field)| {
                field
                    .as_str()
                    .map(|field| (placeholder.clone(), field.to_string()))
                    .ok_or_else(|| format!("name placeholder {placeholder} must map to a string"))
            })
            .collect::<Result<_, String>>()?;
        let values: HashMap<String, AttributeValue> = update
            .values
            .iter()
            .map(|(placeholder, value)| Ok((placeholder.clone(), value_to_attribute(value)?)))
            .collect::<Result<_, String>>()?;

        let client = self.client.clone();
        let table_name = self.table_name.clone();
        let task_id = id.to_string();
        let expression = update.expression.clone();

        let output = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .update_item()
                    .table_name(table_name)
                    .key("id", AttributeValue::S(task_id))
                    .update_expression(expression)
                    .set_expression_attribute_names(Some(names))
                    .set_expression_attribute_values(Some(values))
                    .return_values(ReturnValue::AllNew)
                    .send()
                    .await
                    .map_err(|error| format!("failed to update item in dynamodb: {error}"))
            })
        })?;

        Ok(output
            .attributes()
            .map(item_to_record)
            .transpose()?
            .unwrap_or_default())
    }

    fn delete_item(&self, id: &str) -> Result<Option<TaskRecord>, String> {
        let client = self.client.clone();
        let table_name = self.table_name.clone();
        let task_id = id.to_string();

        let output = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .delete_item()
                    .table_name(table_name)
                    .key("id", AttributeValue::S(task_id))
                    .return_values(ReturnValue::AllOld)
                    .send()
                    .await
                    .map_err(|error| format!("failed to delete item from dynamodb: {error}"))
            })
        })?;

        output.attributes().map(item_to_record).transpose()
    }

    fn scan(&self, limit: i32, exclusive_start_key: Option<&Value>) -> Result<ScanPage, String> {
        let start_key = exclusive_start_key.map(cursor_to_key).transpose()?;
        let client = self.client.clone();
        let table_name = self.table_name.clone();

        let output = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .scan()
                    .table_name(table_name)
                    .limit(limit)
                    .set_exclusive_start_key(start_key)
                    .send()
                    .await
                    .map_err(|error| format!("failed to scan dynamodb table: {error}"))
            })
        })?;

        let items = output
            .items()
            .iter()
            .map(item_to_record)
            .collect::<Result<Vec<_>, String>>()?;
        let last_evaluated_key = output.last_evaluated_key().map(key_to_cursor).transpose()?;

        Ok(ScanPage {
            items,
            last_evaluated_key,
        })
    }
}

/// Records are flat field→scalar mappings, so only the scalar attribute
/// types round-trip; anything else is a malformed row.
fn attribute_to_value(attribute: &AttributeValue) -> Result<Value, String> {
    match attribute {
        AttributeValue::S(text) => Ok(Value::String(text.clone())),
        AttributeValue::N(number) => number
            .parse::<serde_json::Number>()
            .map(Value::Number)
            .map_err(|error| format!("unparseable numeric attribute {number:?}: {error}")),
        AttributeValue::Bool(flag) => Ok(Value::Bool(*flag)),
        AttributeValue::Null(_) => Ok(Value::Null),
        other => Err(format!("unsupported attribute type: {other:?}")),
    }
}

fn value_to_attribute(value: &Value) -> Result<AttributeValue, String> {
    match value {
        Value::Null => Ok(AttributeValue::Null(true)),
        Value::Bool(flag) => Ok(AttributeValue::Bool(*flag)),
        Value::Number(number) => Ok(AttributeValue::N(number.to_string())),
        Value::String(text) => Ok(AttributeValue::S(text.clone())),
        other => Err(format!("unsupported non-scalar value: {other}")),
    }
}

fn item_to_record(item: &HashMap<String, AttributeValue>) -> Result<TaskRecord, String> {
    let mut record = TaskRecord::new();
    for (field, attribute) in item {
        record.insert(field.clone(), attribute_to_value(attribute)?);
    }
    Ok(record)
}

fn record_to_item(record: &TaskRecord) -> Result<HashMap<String, AttributeValue>, String> {
    record
        .iter()
        .map(|(field, value)| Ok((field.clone(), value_to_attribute(value)?)))
        .collect()
}

fn cursor_to_key(cursor: &Value) -> Result<HashMap<String, AttributeValue>, String> {
    let Some(object) = cursor.as_object() else {
        return Err(format!("pagination cursor must be an object: {cursor}"));
    };
    object
        .iter()
        .map(|(field, value)| Ok((field.clone(), value_to_attribute(value)?)))
        .collect()
}

fn key_to_cursor(key: &HashMap<String, AttributeValue>) -> Result<Value, String> {
    let mut object = Map::new();
    for (field, attribute) in key {
        object.insert(field.clone(), attribute_to_value(attribute)?);
    }
    Ok(Value::Object(object))
}
