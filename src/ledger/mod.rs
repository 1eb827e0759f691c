//! Execution ledger module
//!
//! Append-only, queryable store of completed executions plus the record
//! types it holds.

mod store;
mod types;

pub use store::ExecutionLedger;
pub use types::{
    new_execution_id, timestamp_now, ExecutionFilter, ExecutionResult, RequestSnapshot,
    ResponseSnapshot, DEFAULT_LIST_LIMIT,
};
