//! Principal list expansion.

use std::collections::HashSet;

use crate::directory::PrincipalDirectory;
use crate::error::LinkageError;
use crate::principal::PrincipalType;

/// A principal resolved to its owning entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPrincipal {
    /// The principal's own id.
    pub id: String,
    /// Id of the entity that owns the principal's default strategy.
    pub owner_id: String,
    /// Whether the principal is a user or a group.
    pub principal_type: PrincipalType,
}

/// Deduplicates principal id lists and resolves each id to an owning entity.
pub struct PrincipalResolver<D> {
    directory: D,
}

impl<D: PrincipalDirectory> PrincipalResolver<D> {
    /// Creates a resolver over the given directory.
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    /// Resolves a batch of principal ids of one type.
    ///
    /// Input ids are deduplicated, first occurrence winning. Users with an
    /// empty owner are root users and own themselves; groups must always
    /// carry an owner.
    ///
    /// # Errors
    ///
    /// Returns [`LinkageError::PrincipalNotFound`] if any id does not
    /// resolve, in which case no partial results are returned. A group
    /// without an owner is a data-integrity fault surfaced the same way.
    pub fn resolve(
        &self,
        ids: &[String],
        principal_type: PrincipalType,
    ) -> Result<Vec<ResolvedPrincipal>, LinkageError> {
        let mut resolved = Vec::new();
        for id in dedup_first_occurrence(ids) {
            let owner_id = match principal_type {
                PrincipalType::User => {
                    let user = self.directory.get_user(id).ok_or_else(|| {
                        LinkageError::PrincipalNotFound {
                            principal_type,
                            id: id.clone(),
                        }
                    })?;
                    user.owning_entity().to_string()
                }
                PrincipalType::Group => {
                    let group = self.directory.get_group(id).ok_or_else(|| {
                        LinkageError::PrincipalNotFound {
                            principal_type,
                            id: id.clone(),
                        }
                    })?;
                    if group.owner.is_empty() {
                        // Ownerless groups cannot have a default strategy.
                        return Err(LinkageError::PrincipalNotFound {
                            principal_type,
                            id: id.clone(),
                        });
                    }
                    group.owner
                }
            };
            resolved.push(ResolvedPrincipal {
                id: id.clone(),
                owner_id,
                principal_type,
            });
        }
        Ok(resolved)
    }
}

fn dedup_first_occurrence(ids: &[String]) -> Vec<&String> {
    let mut seen = HashSet::new();
    ids.iter().filter(|id| seen.insert(id.as_str())).collect()
}
