//! Audit history for linkage mutations.
//!
//! Every successful store mutation produces exactly one [`RecordEntry`].
//! Recording is best-effort from the linker's perspective: a lost entry
//! never blocks or fails the resource operation, so [`AuditSink::record`]
//! returns nothing.

use std::cell::RefCell;
use std::fmt;

use chrono::{DateTime, Utc};

/// Resource type tag carried by linkage audit entries.
pub const AUTH_STRATEGY_RESOURCE: &str = "auth_strategy";

/// The kind of mutation an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    /// Bindings were added to a strategy.
    Update,
    /// Bindings were removed.
    Delete,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationType::Update => write!(f, "update"),
            OperationType::Delete => write!(f, "delete"),
        }
    }
}

/// An immutable audit fact.
///
/// Created once per principal mutation, never modified. `detail` is the
/// JSON-serialized binding list the mutation applied.
#[derive(Debug, Clone)]
pub struct RecordEntry {
    /// Kind of record, e.g. [`AUTH_STRATEGY_RESOURCE`].
    pub resource_type: String,
    /// Display name of the mutated strategy, `name(id)`.
    pub resource_name: String,
    /// Id of the operator that triggered the mutation.
    pub operator: String,
    /// Whether bindings were added or removed.
    pub operation: OperationType,
    /// Serialized binding list.
    pub detail: String,
    /// When the mutation happened.
    pub happen_time: DateTime<Utc>,
}

impl RecordEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(
        resource_type: impl Into<String>,
        resource_name: impl Into<String>,
        operator: impl Into<String>,
        operation: OperationType,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource_name: resource_name.into(),
            operator: operator.into(),
            operation,
            detail: detail.into(),
            happen_time: Utc::now(),
        }
    }
}

impl fmt::Display for RecordEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RecordEntry[type={}, name={}, operator={}, operation={}]",
            self.resource_type, self.resource_name, self.operator, self.operation
        )
    }
}

/// Destination for audit entries.
///
/// Fire-and-forget: implementations absorb their own failures.
pub trait AuditSink {
    /// Records one entry.
    fn record(&self, entry: RecordEntry);
}

impl<A: AuditSink + ?Sized> AuditSink for &A {
    fn record(&self, entry: RecordEntry) {
        (**self).record(entry)
    }
}

/// In-memory recorder for audit entries.
///
/// Stores entries in a vector in arrival order. Used by this crate's tests;
/// production callers implement [`AuditSink`] against their real history
/// pipeline.
///
/// # Example
///
/// ```
/// use policy_linkage::{AuditSink, AuditTrail, OperationType, RecordEntry};
///
/// let trail = AuditTrail::new();
/// trail.record(RecordEntry::new(
///     "auth_strategy",
///     "default (u-1)",
///     "u-1",
///     OperationType::Update,
///     "[]",
/// ));
///
/// assert_eq!(trail.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct AuditTrail {
    entries: RefCell<Vec<RecordEntry>>,
}

impl AuditTrail {
    /// Creates an empty trail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded entries.
    pub fn entries(&self) -> Vec<RecordEntry> {
        self.entries.borrow().clone()
    }

    /// Returns the number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns `true` if no entries have been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Clears all recorded entries.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl AuditSink for AuditTrail {
    fn record(&self, entry: RecordEntry) {
        self.entries.borrow_mut().push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(operation: OperationType) -> RecordEntry {
        RecordEntry::new(
            AUTH_STRATEGY_RESOURCE,
            "default (u-1)",
            "u-1",
            operation,
            "[]",
        )
    }

    #[test]
    fn trail_starts_empty() {
        let trail = AuditTrail::new();
        assert!(trail.is_empty());
        assert_eq!(trail.len(), 0);
    }

    #[test]
    fn trail_records_in_order() {
        let trail = AuditTrail::new();
        trail.record(entry(OperationType::Update));
        trail.record(entry(OperationType::Delete));

        let entries = trail.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].operation, OperationType::Update);
        assert_eq!(entries[1].operation, OperationType::Delete);
    }

    #[test]
    fn trail_can_be_cleared() {
        let trail = AuditTrail::new();
        trail.record(entry(OperationType::Update));
        trail.clear();
        assert!(trail.is_empty());
    }

    #[test]
    fn entry_display_names_the_mutation() {
        let display = entry(OperationType::Delete).to_string();
        assert!(display.contains("auth_strategy"));
        assert!(display.contains("delete"));
    }
}
