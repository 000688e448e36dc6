//! Principal directory lookups.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::principal::{GroupRecord, UserRecord};

/// Read access to the user/group directory.
///
/// The linkage core never writes to the directory; it only resolves the
/// principal ids named in a request to their records and owning entities.
pub trait PrincipalDirectory {
    /// Fetches a user record by id, or `None` if no such user exists.
    fn get_user(&self, id: &str) -> Option<UserRecord>;

    /// Fetches a group record by id, or `None` if no such group exists.
    fn get_group(&self, id: &str) -> Option<GroupRecord>;
}

impl<D: PrincipalDirectory + ?Sized> PrincipalDirectory for &D {
    fn get_user(&self, id: &str) -> Option<UserRecord> {
        (**self).get_user(id)
    }

    fn get_group(&self, id: &str) -> Option<GroupRecord> {
        (**self).get_group(id)
    }
}

/// Map-backed in-memory directory.
///
/// Reference implementation used by this crate's tests; production callers
/// implement [`PrincipalDirectory`] against their real user service. The
/// lookup counter lets tests assert that gated-off invocations touch the
/// directory zero times.
///
/// # Example
///
/// ```
/// use policy_linkage::{MemoryDirectory, PrincipalDirectory, UserRecord};
///
/// let directory = MemoryDirectory::new();
/// directory.add_user(UserRecord::new("u-1", "Alice", ""));
///
/// assert!(directory.get_user("u-1").is_some());
/// assert!(directory.get_user("u-2").is_none());
/// assert_eq!(directory.lookups(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    users: RefCell<HashMap<String, UserRecord>>,
    groups: RefCell<HashMap<String, GroupRecord>>,
    lookups: Cell<usize>,
}

impl MemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user record.
    pub fn add_user(&self, user: UserRecord) {
        self.users.borrow_mut().insert(user.id.clone(), user);
    }

    /// Registers a group record.
    pub fn add_group(&self, group: GroupRecord) {
        self.groups.borrow_mut().insert(group.id.clone(), group);
    }

    /// Returns how many lookups (hits and misses) have been served.
    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

impl PrincipalDirectory for MemoryDirectory {
    fn get_user(&self, id: &str) -> Option<UserRecord> {
        self.lookups.set(self.lookups.get() + 1);
        self.users.borrow().get(id).cloned()
    }

    fn get_group(&self, id: &str) -> Option<GroupRecord> {
        self.lookups.set(self.lookups.get() + 1);
        self.groups.borrow().get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_returns_registered_records() {
        let directory = MemoryDirectory::new();
        directory.add_user(UserRecord::new("u-1", "Alice", "u-root"));
        directory.add_group(GroupRecord::new("g-1", "ops", "u-root"));

        let user = directory.get_user("u-1").expect("user exists");
        assert_eq!(user.name, "Alice");

        let group = directory.get_group("g-1").expect("group exists");
        assert_eq!(group.owner, "u-root");
    }

    #[test]
    fn directory_counts_misses_too() {
        let directory = MemoryDirectory::new();
        assert!(directory.get_user("nope").is_none());
        assert!(directory.get_group("nope").is_none());
        assert_eq!(directory.lookups(), 2);
    }
}
