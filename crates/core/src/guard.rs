//! Referential guard: refuse to delete a parent while children still point at it.
//!
//! Child counts are always computed on demand (a query against the child
//! table), never from a cached collection on the parent.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// `true` when nothing references the parent.
pub fn can_delete(blocking_count: u64) -> bool {
    blocking_count == 0
}

/// Fail with a [`DomainError::Conflict`] carrying `blocking_count` if it is non-zero.
///
/// `what` describes the parent ("author 'Leo Tolstoy'") and `dependents` the
/// child rows ("books").
pub fn ensure_deletable(what: &str, dependents: &str, blocking_count: u64) -> DomainResult<()> {
    if can_delete(blocking_count) {
        return Ok(());
    }
    Err(DomainError::blocked(
        format!("cannot delete {what}: {blocking_count} {dependents} still reference it"),
        blocking_count,
    ))
}

/// A parent that was skipped by a batch deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedDeletion<Id> {
    pub id: Id,
    pub label: String,
    pub blocking_count: u64,
}

/// An id whose deletion failed for a reason other than dependents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedDeletion<Id> {
    pub id: Id,
    pub reason: String,
}

/// Per-id outcome of a batch deletion.
///
/// Batches are not all-or-nothing: every id is judged on its own, so a report
/// may contain deletions and blocks at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDeletion<Id> {
    pub deleted: Vec<Id>,
    pub blocked: Vec<BlockedDeletion<Id>>,
    /// Ids that did not resolve to an existing row.
    pub missing: Vec<Id>,
    pub failed: Vec<FailedDeletion<Id>>,
}

impl<Id> Default for BatchDeletion<Id> {
    fn default() -> Self {
        Self {
            deleted: Vec::new(),
            blocked: Vec::new(),
            missing: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<Id> BatchDeletion<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_deleted(&mut self, id: Id) {
        self.deleted.push(id);
    }

    pub fn record_blocked(&mut self, id: Id, label: impl Into<String>, blocking_count: u64) {
        self.blocked.push(BlockedDeletion {
            id,
            label: label.into(),
            blocking_count,
        });
    }

    pub fn record_missing(&mut self, id: Id) {
        self.missing.push(id);
    }

    pub fn record_failed(&mut self, id: Id, reason: impl Into<String>) {
        self.failed.push(FailedDeletion {
            id,
            reason: reason.into(),
        });
    }

    /// File the result of deleting `id`: `NotFound` counts as missing, any
    /// other error as failed. The batch goes on either way.
    pub fn record_outcome(&mut self, id: Id, outcome: DomainResult<()>) {
        match outcome {
            Ok(()) => self.record_deleted(id),
            Err(DomainError::NotFound { .. }) => self.record_missing(id),
            Err(err) => self.record_failed(id, err.to_string()),
        }
    }

    /// `true` when every requested id was deleted.
    pub fn is_complete(&self) -> bool {
        self.blocked.is_empty() && self.missing.is_empty() && self.failed.is_empty()
    }

    /// Human readable summary of the blocked parents, e.g. `"Poetry (3), Drama (1)"`.
    pub fn blocked_summary(&self) -> String {
        self.blocked
            .iter()
            .map(|b| format!("{} ({})", b.label, b.blocking_count))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dependents_is_deletable() {
        assert!(can_delete(0));
        assert!(ensure_deletable("genre 'Poetry'", "books", 0).is_ok());
    }

    #[test]
    fn dependents_block_with_exact_count() {
        let err = ensure_deletable("author 'Leo Tolstoy'", "books", 2).unwrap_err();
        assert_eq!(err.blocking_count(), Some(2));
        assert!(err.to_string().contains("2 books"));
    }

    #[test]
    fn batch_report_tracks_partial_success() {
        let mut report = BatchDeletion::new();
        report.record_deleted(1);
        report.record_blocked(2, "Poetry", 3);
        report.record_blocked(3, "Drama", 1);
        assert!(!report.is_complete());
        assert_eq!(report.deleted, vec![1]);
        assert_eq!(report.blocked_summary(), "Poetry (3), Drama (1)");
    }

    #[test]
    fn outcomes_are_filed_per_id() {
        let mut report = BatchDeletion::new();
        report.record_outcome(1, Ok(()));
        report.record_outcome(2, Err(DomainError::not_found("loan", 2)));
        report.record_outcome(3, Err(DomainError::validation("quantity overflow")));
        report.record_outcome(4, Ok(()));

        assert_eq!(report.deleted, vec![1, 4]);
        assert_eq!(report.missing, vec![2]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].id, 3);
        assert!(report.failed[0].reason.contains("quantity overflow"));
        assert!(!report.is_complete());
    }
}
