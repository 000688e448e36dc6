//! Per-request context handed to the linkage hook.
//!
//! The hook runs after a resource mutation has already been committed. The
//! caller that performed the mutation builds one [`AcquireContext`] per
//! request, attaches the typed [`ResourceLinkageAttachments`], and discards
//! the context once the hook returns.

use std::collections::BTreeMap;
use std::fmt;

use crate::strategy::ResourceType;

/// The kind of resource operation that triggered the hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// A resource was created.
    Create,
    /// A resource was updated.
    Update,
    /// A resource was deleted.
    Delete,
    /// A read-only access; the hook never runs for these.
    Read,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
            Operation::Read => write!(f, "read"),
        }
    }
}

/// Where the request entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A client SDK / data-plane call.
    Client,
    /// A console / management-plane call.
    Console,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Client => write!(f, "client"),
            Origin::Console => write!(f, "console"),
        }
    }
}

/// The kind of token the operator presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    /// A user token; implicit ownership lands in the add-users set.
    User,
    /// A group or service token; implicit ownership lands in the add-groups set.
    Group,
}

/// Identity of the caller that performed the resource mutation.
///
/// An empty id is the "anyone can operate" sentinel: the resource was
/// created publicly and no ownership is recorded for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorInfo {
    /// Operator principal id; empty for public operations.
    pub id: String,
    /// Whether the token identifies a user or a group.
    pub kind: OperatorKind,
}

impl OperatorInfo {
    /// Creates operator info for a user token.
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: OperatorKind::User,
        }
    }

    /// Creates operator info for a group or service token.
    pub fn group(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: OperatorKind::Group,
        }
    }

    /// Returns `true` if this is the public "anyone can operate" sentinel.
    pub fn is_anonymous(&self) -> bool {
        self.id.is_empty()
    }
}

/// One resource touched by the mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    /// Resource id.
    pub id: String,
    /// Resource name, for logs and audit detail.
    pub name: String,
}

impl ResourceEntry {
    /// Creates a resource entry.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Typed attachment data for the linkage hook.
///
/// Replaces an untyped key-value attachment bag: the caller that builds the
/// [`AcquireContext`] fills in explicit fields instead of downcasting at the
/// consumption site.
#[derive(Debug, Clone, Default)]
pub struct ResourceLinkageAttachments {
    /// The resources operated on, grouped by type.
    pub resources: BTreeMap<ResourceType, Vec<ResourceEntry>>,
    /// Principal ids to link (users).
    pub add_users: Vec<String>,
    /// Principal ids to link (groups).
    pub add_groups: Vec<String>,
    /// Principal ids to unlink (users).
    pub remove_users: Vec<String>,
    /// Principal ids to unlink (groups).
    pub remove_groups: Vec<String>,
    /// The caller's identity; `None` for system-internal operations.
    pub operator: Option<OperatorInfo>,
}

impl ResourceLinkageAttachments {
    /// Creates empty attachments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource under the given type.
    pub fn with_resource(mut self, resource_type: ResourceType, entry: ResourceEntry) -> Self {
        self.resources.entry(resource_type).or_default().push(entry);
        self
    }

    /// Sets the operator identity.
    pub fn with_operator(mut self, operator: OperatorInfo) -> Self {
        self.operator = Some(operator);
        self
    }
}

/// The request context the hook consumes.
#[derive(Debug, Clone)]
pub struct AcquireContext {
    operation: Operation,
    origin: Origin,
    attachments: Option<ResourceLinkageAttachments>,
}

impl AcquireContext {
    /// Creates a context with no attachments.
    pub fn new(operation: Operation, origin: Origin) -> Self {
        Self {
            operation,
            origin,
            attachments: None,
        }
    }

    /// Attaches linkage data to the context.
    pub fn with_attachments(mut self, attachments: ResourceLinkageAttachments) -> Self {
        self.attachments = Some(attachments);
        self
    }

    /// Returns the operation kind.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Returns the request origin.
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Returns the linkage attachments, if the caller supplied any.
    pub fn attachments(&self) -> Option<&ResourceLinkageAttachments> {
        self.attachments.as_ref()
    }
}
