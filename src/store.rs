//! Persistence contract for strategy-to-resource bindings.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};

use crate::error::StoreError;
use crate::principal::PrincipalType;
use crate::strategy::{DefaultStrategy, ResourceType, StrategyRef, StrategyResource};

/// Persistence operations the linkage core relies on.
///
/// Implementations must honor two semantics the correctness of the hook
/// rests on:
///
/// - **Loose add**: inserting a binding that already exists is not an
///   error; duplicate-key conflicts are swallowed by the store.
/// - **Unconditional remove**: removing a binding that does not exist is
///   not an error, and a [`StrategyRef::Any`] binding removes the resource
///   from every strategy that references it.
pub trait StrategyStore {
    /// Fetches the default strategy for a principal, or `Ok(None)` when the
    /// owning entity has none.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the underlying store fails.
    fn default_strategy_by_principal(
        &self,
        principal_id: &str,
        principal_type: PrincipalType,
    ) -> Result<Option<DefaultStrategy>, StoreError>;

    /// Inserts bindings, tolerating pre-existing identical entries.
    ///
    /// Every binding must carry a concrete [`StrategyRef::Id`]; passing
    /// [`StrategyRef::Any`] on the add path is a caller bug and is rejected.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the underlying store fails.
    fn loose_add(&self, bindings: &[StrategyResource]) -> Result<(), StoreError>;

    /// Removes bindings unconditionally.
    ///
    /// A binding with [`StrategyRef::Id`] removes that exact triple; a
    /// binding with [`StrategyRef::Any`] removes the resource from every
    /// strategy. Removing a non-existent binding succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the underlying store fails.
    fn remove(&self, bindings: &[StrategyResource]) -> Result<(), StoreError>;
}

impl<S: StrategyStore + ?Sized> StrategyStore for &S {
    fn default_strategy_by_principal(
        &self,
        principal_id: &str,
        principal_type: PrincipalType,
    ) -> Result<Option<DefaultStrategy>, StoreError> {
        (**self).default_strategy_by_principal(principal_id, principal_type)
    }

    fn loose_add(&self, bindings: &[StrategyResource]) -> Result<(), StoreError> {
        (**self).loose_add(bindings)
    }

    fn remove(&self, bindings: &[StrategyResource]) -> Result<(), StoreError> {
        (**self).remove(bindings)
    }
}

/// Set-backed in-memory strategy store.
///
/// Reference implementation of the [`StrategyStore`] semantics, used by this
/// crate's tests. Bindings live in an ordered set keyed by the full
/// (strategy id, resource type, resource id) triple, which makes loose add
/// naturally idempotent. Call counters let tests assert that gated-off
/// invocations never reach the store.
///
/// # Example
///
/// ```
/// use policy_linkage::{
///     MemoryStrategyStore, ResourceType, StrategyResource, StrategyStore,
/// };
///
/// let store = MemoryStrategyStore::new();
/// let binding = StrategyResource::new("s-1", ResourceType::Service, "r-1");
///
/// store.loose_add(std::slice::from_ref(&binding)).unwrap();
/// store.loose_add(std::slice::from_ref(&binding)).unwrap(); // no duplicate
/// assert_eq!(store.binding_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStrategyStore {
    defaults: RefCell<HashMap<(PrincipalType, String), DefaultStrategy>>,
    bindings: RefCell<BTreeSet<(String, ResourceType, String)>>,
    add_calls: Cell<usize>,
    remove_calls: Cell<usize>,
}

impl MemoryStrategyStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the default strategy for a principal.
    pub fn set_default_strategy(
        &self,
        principal_id: impl Into<String>,
        principal_type: PrincipalType,
        strategy: DefaultStrategy,
    ) {
        self.defaults
            .borrow_mut()
            .insert((principal_type, principal_id.into()), strategy);
    }

    /// Inserts a binding directly, bypassing the trait. Test setup helper
    /// for pre-existing state (e.g. bindings owned by other strategies).
    pub fn insert_binding(
        &self,
        strategy_id: impl Into<String>,
        resource_type: ResourceType,
        resource_id: impl Into<String>,
    ) {
        self.bindings
            .borrow_mut()
            .insert((strategy_id.into(), resource_type, resource_id.into()));
    }

    /// Returns `true` if the exact triple is present.
    pub fn contains(&self, strategy_id: &str, resource_type: ResourceType, resource_id: &str) -> bool {
        self.bindings.borrow().contains(&(
            strategy_id.to_string(),
            resource_type,
            resource_id.to_string(),
        ))
    }

    /// Returns a snapshot of all bindings, ordered by triple.
    pub fn bindings(&self) -> Vec<(String, ResourceType, String)> {
        self.bindings.borrow().iter().cloned().collect()
    }

    /// Returns the number of stored bindings.
    pub fn binding_count(&self) -> usize {
        self.bindings.borrow().len()
    }

    /// Returns how many times `loose_add` has been called.
    pub fn add_calls(&self) -> usize {
        self.add_calls.get()
    }

    /// Returns how many times `remove` has been called.
    pub fn remove_calls(&self) -> usize {
        self.remove_calls.get()
    }
}

impl StrategyStore for MemoryStrategyStore {
    fn default_strategy_by_principal(
        &self,
        principal_id: &str,
        principal_type: PrincipalType,
    ) -> Result<Option<DefaultStrategy>, StoreError> {
        Ok(self
            .defaults
            .borrow()
            .get(&(principal_type, principal_id.to_string()))
            .cloned())
    }

    fn loose_add(&self, bindings: &[StrategyResource]) -> Result<(), StoreError> {
        self.add_calls.set(self.add_calls.get() + 1);
        let mut stored = self.bindings.borrow_mut();
        for binding in bindings {
            match &binding.strategy {
                StrategyRef::Id(id) => {
                    stored.insert((
                        id.clone(),
                        binding.resource_type,
                        binding.resource_id.clone(),
                    ));
                }
                StrategyRef::Any => {
                    return Err(StoreError::new(
                        "loose add requires a concrete strategy id",
                    ));
                }
            }
        }
        Ok(())
    }

    fn remove(&self, bindings: &[StrategyResource]) -> Result<(), StoreError> {
        self.remove_calls.set(self.remove_calls.get() + 1);
        let mut stored = self.bindings.borrow_mut();
        for binding in bindings {
            match &binding.strategy {
                StrategyRef::Id(id) => {
                    stored.remove(&(
                        id.clone(),
                        binding.resource_type,
                        binding.resource_id.clone(),
                    ));
                }
                StrategyRef::Any => {
                    stored.retain(|(_, resource_type, resource_id)| {
                        *resource_type != binding.resource_type
                            || *resource_id != binding.resource_id
                    });
                }
            }
        }
        Ok(())
    }
}
