//! Per-principal binding mutation.

use tracing::error;

use crate::audit::{AuditSink, OperationType, RecordEntry, AUTH_STRATEGY_RESOURCE};
use crate::context::{AcquireContext, Operation};
use crate::error::LinkageError;
use crate::resolver::ResolvedPrincipal;
use crate::store::StrategyStore;
use crate::strategy::{StrategyRef, StrategyResource};

/// Applies one principal's binding mutation against the strategy store.
///
/// The linker owns the two-axis branch at the heart of the hook: the
/// operation kind (Delete detaches globally) crossed with whether the
/// caller explicitly asked for an unlink. Every successful store mutation
/// is followed by exactly one audit entry; audit emission is best-effort
/// and never fails the mutation.
pub struct StrategyLinker<S, A> {
    store: S,
    audit: A,
}

impl<S: StrategyStore, A: AuditSink> StrategyLinker<S, A> {
    /// Creates a linker over a store and an audit sink.
    pub fn new(store: S, audit: A) -> Self {
        Self { store, audit }
    }

    /// Links or unlinks the context's resources for one resolved principal.
    ///
    /// Builds one binding per (resource type, resource id) pair in the
    /// attachment map. For Delete operations the bindings carry
    /// [`StrategyRef::Any`] so the store detaches the resource from every
    /// strategy that references it, not just this principal's default
    /// strategy. An empty attachment map is a no-op success.
    ///
    /// # Errors
    ///
    /// - [`LinkageError::DefaultStrategyNotFound`] when the owning entity
    ///   has no default strategy record.
    /// - [`LinkageError::Store`] when the store mutation fails; the audit
    ///   entry is only emitted after a successful mutation.
    pub fn apply(
        &self,
        principal: &ResolvedPrincipal,
        ctx: &AcquireContext,
        explicit_unlink: bool,
    ) -> Result<(), LinkageError> {
        let strategy = self
            .store
            .default_strategy_by_principal(&principal.id, principal.principal_type)
            .map_err(|err| {
                error!(
                    principal = %principal.id,
                    owner = %principal.owner_id,
                    "default strategy lookup failed: {}", err
                );
                LinkageError::Store(err)
            })?
            .ok_or_else(|| LinkageError::DefaultStrategyNotFound {
                principal_type: principal.principal_type,
                id: principal.id.clone(),
            })?;

        let Some(attachments) = ctx.attachments() else {
            return Ok(());
        };
        if attachments.resources.is_empty() {
            return Ok(());
        }

        // Deleting a resource must clean every strategy that still
        // references it, not only this principal's default strategy.
        let strategy_ref = if ctx.operation() == Operation::Delete {
            StrategyRef::Any
        } else {
            StrategyRef::Id(strategy.id.clone())
        };

        let mut bindings = Vec::new();
        for (resource_type, entries) in &attachments.resources {
            for entry in entries {
                bindings.push(StrategyResource {
                    strategy: strategy_ref.clone(),
                    resource_type: *resource_type,
                    resource_id: entry.id.clone(),
                });
            }
        }

        let operator = attachments
            .operator
            .as_ref()
            .map(|op| op.id.clone())
            .unwrap_or_default();
        let resource_name = format!("{}({})", strategy.name, strategy.id);
        let detail = serde_json::to_string(&bindings).unwrap_or_default();

        if ctx.operation() == Operation::Delete || explicit_unlink {
            self.store.remove(&bindings).map_err(|err| {
                error!(
                    principal = %principal.id,
                    kind = %principal.principal_type,
                    "remove strategy bindings failed: {}", err
                );
                LinkageError::Store(err)
            })?;
            self.audit.record(RecordEntry::new(
                AUTH_STRATEGY_RESOURCE,
                resource_name,
                operator,
                OperationType::Delete,
                detail,
            ));
            return Ok(());
        }

        self.store.loose_add(&bindings).map_err(|err| {
            error!(
                principal = %principal.id,
                kind = %principal.principal_type,
                "add strategy bindings failed: {}", err
            );
            LinkageError::Store(err)
        })?;
        self.audit.record(RecordEntry::new(
            AUTH_STRATEGY_RESOURCE,
            resource_name,
            operator,
            OperationType::Update,
            detail,
        ));
        Ok(())
    }
}
