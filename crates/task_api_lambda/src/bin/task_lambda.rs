use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use task_api_core::contract::ResponseEnvelope;
use task_api_lambda::adapters::dynamodb::DynamoRecordStore;
use task_api_lambda::handlers::dispatch::handle_task_event;

async fn handle_request(
    event: LambdaEvent<Value>,
    store: &DynamoRecordStore,
) -> Result<ResponseEnvelope, Error> {
    Ok(handle_task_event(&event.payload, store))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let table_name = std::env::var("TASKS_TABLE").unwrap_or_else(|_| "Tasks".to_string());
    let endpoint = std::env::var("DYNAMODB_ENDPOINT").ok();

    // Cold-start initialization: region and credentials come from the SDK
    // environment chain; the client is shared read-only across invocations.
    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let mut builder = aws_sdk_dynamodb::config::Builder::from(&config);
    if let Some(endpoint) = endpoint.as_deref() {
        builder = builder.endpoint_url(endpoint);
    }
    let client = aws_sdk_dynamodb::Client::from_conf(builder.build());
    let store = DynamoRecordStore::new(client, table_name);
    let store_ref = &store;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, store_ref).await
    }))
    .await
}
