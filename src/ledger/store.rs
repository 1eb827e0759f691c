//! In-memory execution ledger
//!
//! Append-only from the engine's point of view. When a capacity is set the
//! oldest appended records are evicted first.

use super::types::{ExecutionFilter, ExecutionResult};
use std::collections::{HashMap, VecDeque};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};

#[derive(Debug)]
struct StoredRecord {
    seq: u64,
    result: ExecutionResult,
}

#[derive(Debug, Default)]
struct LedgerInner {
    records: HashMap<String, StoredRecord>,
    order: VecDeque<String>,
    next_seq: u64,
}

/// Queryable store of completed executions
#[derive(Debug)]
pub struct ExecutionLedger {
    inner: RwLock<LedgerInner>,
    capacity: Option<usize>,
}

impl ExecutionLedger {
    /// Create a ledger with an optional retention bound
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            inner: RwLock::new(LedgerInner::default()),
            capacity,
        }
    }

    /// Create a ledger that never evicts
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// Retention bound
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Append a record
    ///
    /// Returns `false` without touching the ledger when the id is already
    /// present: records are immutable once written.
    pub fn append(&self, result: ExecutionResult) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        if inner.records.contains_key(&result.execution_id) {
            warn!(
                execution_id = %result.execution_id,
                "Execution id already recorded, keeping the original"
            );
            return false;
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.order.push_back(result.execution_id.clone());
        inner
            .records
            .insert(result.execution_id.clone(), StoredRecord { seq, result });

        if let Some(capacity) = self.capacity {
            while inner.records.len() > capacity {
                let Some(oldest) = inner.order.pop_front() else {
                    break;
                };
                inner.records.remove(&oldest);
                debug!(execution_id = %oldest, "Evicted execution from ledger");
            }
        }

        true
    }

    /// Look up a record by id
    pub fn get(&self, execution_id: &str) -> Option<ExecutionResult> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.records.get(execution_id).map(|r| r.result.clone())
    }

    /// Records matching `filter`, newest first, at most `limit`
    ///
    /// Ordering is by `executed_at` descending; records sharing a timestamp
    /// are ordered by append order, latest first.
    pub fn list(&self, filter: &ExecutionFilter, limit: usize) -> Vec<ExecutionResult> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);

        let mut matched: Vec<&StoredRecord> = inner
            .records
            .values()
            .filter(|r| filter.matches(&r.result))
            .collect();

        matched.sort_by(|a, b| {
            (b.result.executed_at.as_str(), b.seq).cmp(&(a.result.executed_at.as_str(), a.seq))
        });

        matched
            .into_iter()
            .take(limit)
            .map(|r| r.result.clone())
            .collect()
    }

    /// Number of retained records
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .len()
    }

    /// Whether the ledger holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ExecutionLedger {
    fn default() -> Self {
        Self::new(Some(crate::config::DEFAULT_LEDGER_CAPACITY))
    }
}
