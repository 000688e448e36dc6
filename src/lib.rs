//! Default-strategy resource linkage for authorization layers.
//!
//! After a resource mutation commits, the owning system invokes this crate's
//! [`LinkageCoordinator`] to keep default strategies in sync with resource
//! lifecycles:
//!
//! - **Implicit ownership**: the creator of a resource (and any principals
//!   named in the request) is linked to it through the owning entity's
//!   default strategy.
//! - **Idempotent re-linking**: linking the same resource twice converges to
//!   a single binding; stores swallow duplicate-key conflicts.
//! - **Cascade unlink on delete**: deleting a resource detaches it from
//!   *every* strategy that references it, not just the actor's.
//!
//! # Core Types
//!
//! - [`LinkageCoordinator`]: the post-mutation hook entry point
//! - [`AcquireContext`] / [`ResourceLinkageAttachments`]: typed per-request input
//! - [`OperationGate`]: configuration-driven filter deciding if the hook runs
//! - [`StrategyLinker`]: per-principal binding mutation
//! - [`PrincipalDirectory`], [`StrategyStore`], [`AuditSink`]: collaborator traits
//!
//! # Examples
//!
//! ```
//! use policy_linkage::{
//!     AcquireContext, AuditTrail, AuthConfig, DefaultStrategy, LinkageCoordinator,
//!     MemoryDirectory, MemoryStrategyStore, Operation, OperatorInfo, Origin,
//!     PrincipalType, ResourceEntry, ResourceLinkageAttachments, ResourceType,
//!     UserRecord,
//! };
//!
//! let directory = MemoryDirectory::new();
//! directory.add_user(UserRecord::new("u-1", "Alice", ""));
//!
//! let store = MemoryStrategyStore::new();
//! store.set_default_strategy(
//!     "u-1",
//!     PrincipalType::User,
//!     DefaultStrategy::new("s-u1", "default (u-1)"),
//! );
//!
//! let trail = AuditTrail::new();
//! let coordinator =
//!     LinkageCoordinator::new(AuthConfig::default(), &directory, &store, &trail);
//!
//! let ctx = AcquireContext::new(Operation::Create, Origin::Console).with_attachments(
//!     ResourceLinkageAttachments::new()
//!         .with_operator(OperatorInfo::user("u-1"))
//!         .with_resource(ResourceType::Service, ResourceEntry::new("r-1", "svc-a")),
//! );
//!
//! coordinator.after_resource_operation(&ctx).unwrap();
//! assert!(store.contains("s-u1", ResourceType::Service, "r-1"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod audit;
mod config;
mod context;
mod coordinator;
mod directory;
mod error;
mod gate;
mod linker;
mod principal;
mod resolver;
mod store;
mod strategy;

pub use audit::{AuditSink, AuditTrail, OperationType, RecordEntry, AUTH_STRATEGY_RESOURCE};
pub use config::AuthConfig;
pub use context::{
    AcquireContext, Operation, OperatorInfo, OperatorKind, Origin, ResourceEntry,
    ResourceLinkageAttachments,
};
pub use coordinator::LinkageCoordinator;
pub use directory::{MemoryDirectory, PrincipalDirectory};
pub use error::{LinkageError, StoreError};
pub use gate::OperationGate;
pub use linker::StrategyLinker;
pub use principal::{GroupRecord, PrincipalType, UserRecord};
pub use resolver::{PrincipalResolver, ResolvedPrincipal};
pub use store::{MemoryStrategyStore, StrategyStore};
pub use strategy::{DefaultStrategy, ResourceType, StrategyRef, StrategyResource};
