//! Strategy records and strategy-to-resource bindings.
//!
//! A *default strategy* is the implicit, non-user-editable policy record
//! that grants a principal rights over the resources it owns. Linking a
//! resource to a principal means inserting a [`StrategyResource`] binding
//! into the principal's default strategy.

use std::fmt;

use serde::Serialize;

/// The kind of resource a binding refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// A namespace.
    Namespace,
    /// A registered service.
    Service,
    /// A configuration group.
    ConfigGroup,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceType::Namespace => write!(f, "namespace"),
            ResourceType::Service => write!(f, "service"),
            ResourceType::ConfigGroup => write!(f, "config_group"),
        }
    }
}

/// Identifies which strategy a binding belongs to.
///
/// Removal with [`StrategyRef::Any`] matches on resource identity alone,
/// detaching the resource from every strategy that still references it.
/// This is the cascade used when a resource is deleted: cleanup must reach
/// all strategies, not just the default strategy of the immediate actor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyRef {
    /// A specific strategy, by id.
    Id(String),
    /// Any strategy; valid only for removal.
    Any,
}

impl fmt::Display for StrategyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyRef::Id(id) => write!(f, "{}", id),
            StrategyRef::Any => write!(f, "<any>"),
        }
    }
}

/// A strategy-to-resource binding.
///
/// Identity is the full triple: two bindings are the same binding only when
/// strategy, resource type, and resource id all match. Stores must not
/// accumulate duplicates — add is idempotent, remove is unconditional.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StrategyResource {
    /// The strategy this binding attaches to (or detaches from).
    pub strategy: StrategyRef,
    /// Kind of the bound resource.
    pub resource_type: ResourceType,
    /// Id of the bound resource.
    pub resource_id: String,
}

impl StrategyResource {
    /// Creates a binding against a specific strategy.
    pub fn new(
        strategy_id: impl Into<String>,
        resource_type: ResourceType,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            strategy: StrategyRef::Id(strategy_id.into()),
            resource_type,
            resource_id: resource_id.into(),
        }
    }

    /// Creates a binding that matches the resource in every strategy.
    ///
    /// Only meaningful for removal; see [`StrategyRef::Any`].
    pub fn any_strategy(resource_type: ResourceType, resource_id: impl Into<String>) -> Self {
        Self {
            strategy: StrategyRef::Any,
            resource_type,
            resource_id: resource_id.into(),
        }
    }
}

/// The default strategy record of one owning entity.
///
/// Every principal has at most one. This crate never creates one: a missing
/// default strategy is surfaced as a fatal error by the linker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultStrategy {
    /// Unique strategy id.
    pub id: String,
    /// Human-readable strategy name.
    pub name: String,
}

impl DefaultStrategy {
    /// Creates a default strategy record.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
