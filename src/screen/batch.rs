//! Bounded-concurrency batch runner for bulk operations that have no
//! batch API.
//!
//! Individual failures never stop the batch; every item is attempted and
//! the outcome aggregates success/fail counts plus per-item errors for
//! the summary notification.

use std::fmt::Display;
use std::future::Future;

use futures_util::stream::{self, StreamExt};

use crate::api::RowError;

/// Aggregated result of a bulk operation.
#[derive(Debug, Default)]
pub struct BulkOutcome {
    pub success: usize,
    pub failed: usize,
    /// Per-item failures, indexed into the submitted batch.
    pub row_errors: Vec<RowError>,
}

impl BulkOutcome {
    pub fn failed_indices(&self) -> Vec<usize> {
        self.row_errors.iter().map(|e| e.row).collect()
    }

    /// One-line summary for the notification, e.g. `Deleted 5, 2 failed`.
    pub fn summary(&self, verb: &str) -> String {
        if self.failed == 0 {
            format!("{verb} {}", self.success)
        } else {
            format!("{verb} {}, {} failed", self.success, self.failed)
        }
    }
}

/// Run `op` over every item with at most `concurrency` requests in
/// flight. Completion order does not matter; errors are reported against
/// the item's original index.
pub async fn run_bulk<T, F, Fut, E>(items: Vec<T>, concurrency: usize, op: F) -> BulkOutcome
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let results: Vec<(usize, Result<(), E>)> = stream::iter(items.into_iter().enumerate())
        .map(|(index, item)| {
            let fut = op(item);
            async move { (index, fut.await) }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut outcome = BulkOutcome::default();
    for (index, result) in results {
        match result {
            Ok(()) => outcome.success += 1,
            Err(e) => {
                outcome.failed += 1;
                outcome.row_errors.push(RowError {
                    row: index,
                    field: None,
                    message: e.to_string(),
                });
            }
        }
    }
    outcome.row_errors.sort_by_key(|e| e.row);
    outcome
}
