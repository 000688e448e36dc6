use std::fmt;

/// The kind of principal a record describes.
///
/// Strategy lookups and audit entries are keyed by principal kind, so it
/// travels alongside the principal id everywhere in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrincipalType {
    /// An individual user account.
    User,
    /// A user group.
    Group,
}

impl fmt::Display for PrincipalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrincipalType::User => write!(f, "user"),
            PrincipalType::Group => write!(f, "group"),
        }
    }
}

/// A user record as returned by the principal directory.
///
/// `owner` is the id of the entity that owns this user. A root user owns
/// itself and carries an empty `owner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique user id.
    pub id: String,
    /// Human-readable user name.
    pub name: String,
    /// Owning entity id; empty for a root/self-owned user.
    pub owner: String,
}

impl UserRecord {
    /// Creates a user record.
    pub fn new(id: impl Into<String>, name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            owner: owner.into(),
        }
    }

    /// Returns the owning entity id, falling back to the user's own id for
    /// root users.
    pub fn owning_entity(&self) -> &str {
        if self.owner.is_empty() {
            &self.id
        } else {
            &self.owner
        }
    }
}

/// A group record as returned by the principal directory.
///
/// Unlike users, groups never own themselves: an empty `owner` is a
/// data-integrity fault, not a root marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    /// Unique group id.
    pub id: String,
    /// Human-readable group name.
    pub name: String,
    /// Owning entity id; must be non-empty.
    pub owner: String,
}

impl GroupRecord {
    /// Creates a group record.
    pub fn new(id: impl Into<String>, name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            owner: owner.into(),
        }
    }
}
