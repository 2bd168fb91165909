//! AWS-oriented adapters and handlers for the task API backend.
//!
//! This crate owns runtime integration details (the Lambda handler, event
//! dispatch, and the DynamoDB record-store adapter) on top of the contracts
//! in `task_api_core`.

pub mod adapters;
pub mod handlers;
