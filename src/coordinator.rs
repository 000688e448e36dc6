//! Top-level linkage entry point.

use tracing::{debug, error, info};

use crate::audit::AuditSink;
use crate::config::AuthConfig;
use crate::context::{AcquireContext, Operation, OperatorKind};
use crate::directory::PrincipalDirectory;
use crate::error::LinkageError;
use crate::gate::OperationGate;
use crate::linker::StrategyLinker;
use crate::principal::PrincipalType;
use crate::resolver::PrincipalResolver;
use crate::store::StrategyStore;

/// Runs the default-strategy linkage hook after a resource mutation.
///
/// One coordinator is built at startup and invoked once per committed
/// resource mutation. It filters through the [`OperationGate`], expands the
/// four principal-id lists via the [`PrincipalResolver`], and applies each
/// principal's mutation through the [`StrategyLinker`], strictly
/// sequentially.
///
/// On failure the coordinator aborts immediately: mutations already applied
/// by earlier steps of the same invocation are not rolled back. See
/// [`LinkageError`] for the contract callers must honor.
///
/// # Examples
///
/// ```
/// use policy_linkage::{
///     AcquireContext, AuditTrail, AuthConfig, LinkageCoordinator, MemoryDirectory,
///     MemoryStrategyStore, Operation, Origin,
/// };
///
/// let directory = MemoryDirectory::new();
/// let store = MemoryStrategyStore::new();
/// let trail = AuditTrail::new();
/// let coordinator = LinkageCoordinator::new(AuthConfig::default(), &directory, &store, &trail);
///
/// // No attachments: system-internal operation, nothing to link.
/// let ctx = AcquireContext::new(Operation::Create, Origin::Console);
/// coordinator.after_resource_operation(&ctx).unwrap();
/// assert_eq!(store.binding_count(), 0);
/// ```
pub struct LinkageCoordinator<D, S, A> {
    gate: OperationGate,
    resolver: PrincipalResolver<D>,
    linker: StrategyLinker<S, A>,
}

impl<D, S, A> LinkageCoordinator<D, S, A>
where
    D: PrincipalDirectory,
    S: StrategyStore,
    A: AuditSink,
{
    /// Creates a coordinator from its configuration and collaborators.
    pub fn new(config: AuthConfig, directory: D, store: S, audit: A) -> Self {
        Self {
            gate: OperationGate::new(config),
            resolver: PrincipalResolver::new(directory),
            linker: StrategyLinker::new(store, audit),
        }
    }

    /// Runs the linkage hook for one committed resource mutation.
    ///
    /// Returns `Ok(())` without touching the directory or store when the
    /// gate filters the request out, when the context carries no operator
    /// info, or when the operator is the public "anyone can operate"
    /// sentinel.
    ///
    /// For Create operations the operator's own id is appended to the
    /// add-users or add-groups list (depending on token kind), so a
    /// creator always receives implicit ownership even when the request
    /// omitted it.
    ///
    /// # Errors
    ///
    /// Propagates the first [`LinkageError`] from resolution or linking.
    /// The fixed execution order is add-users, add-groups, remove-users,
    /// remove-groups; steps already applied are not rolled back.
    pub fn after_resource_operation(&self, ctx: &AcquireContext) -> Result<(), LinkageError> {
        if !self.gate.should_run(ctx.operation(), ctx.origin()) {
            debug!(
                operation = %ctx.operation(),
                origin = %ctx.origin(),
                "linkage hook gated off"
            );
            return Ok(());
        }

        let Some(attachments) = ctx.attachments() else {
            return Ok(());
        };
        let Some(operator) = attachments.operator.as_ref() else {
            return Ok(());
        };
        // Publicly operable resources record no ownership.
        if operator.is_anonymous() {
            return Ok(());
        }

        let mut add_users = attachments.add_users.clone();
        let mut add_groups = attachments.add_groups.clone();

        // Only creation grants the operator implicit ownership.
        if ctx.operation() == Operation::Create {
            match operator.kind {
                OperatorKind::User => add_users.push(operator.id.clone()),
                OperatorKind::Group => add_groups.push(operator.id.clone()),
            }
        }

        info!(
            operation = %ctx.operation(),
            add_users = ?add_users,
            add_groups = ?add_groups,
            remove_users = ?attachments.remove_users,
            remove_groups = ?attachments.remove_groups,
            "linking resources to principal default strategies"
        );

        self.link_batch(&add_users, PrincipalType::User, ctx, false)?;
        self.link_batch(&add_groups, PrincipalType::Group, ctx, false)?;
        self.link_batch(&attachments.remove_users, PrincipalType::User, ctx, true)?;
        self.link_batch(&attachments.remove_groups, PrincipalType::Group, ctx, true)?;
        Ok(())
    }

    fn link_batch(
        &self,
        ids: &[String],
        principal_type: PrincipalType,
        ctx: &AcquireContext,
        explicit_unlink: bool,
    ) -> Result<(), LinkageError> {
        if ids.is_empty() {
            return Ok(());
        }
        let resolved = self.resolver.resolve(ids, principal_type)?;
        for principal in &resolved {
            if let Err(err) = self.linker.apply(principal, ctx, explicit_unlink) {
                error!(
                    principal = %principal.id,
                    kind = %principal_type,
                    explicit_unlink,
                    "linkage step failed: {}", err
                );
                return Err(err);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditTrail, OperationType};
    use crate::context::{OperatorInfo, Origin, ResourceEntry, ResourceLinkageAttachments};
    use crate::directory::MemoryDirectory;
    use crate::principal::{GroupRecord, UserRecord};
    use crate::store::MemoryStrategyStore;
    use crate::strategy::{DefaultStrategy, ResourceType};

    struct Fixture {
        directory: MemoryDirectory,
        store: MemoryStrategyStore,
        trail: AuditTrail,
    }

    impl Fixture {
        fn new() -> Self {
            let directory = MemoryDirectory::new();
            directory.add_user(UserRecord::new("u-1", "Alice", ""));
            directory.add_user(UserRecord::new("u-2", "Bob", "u-1"));
            directory.add_group(GroupRecord::new("g-1", "ops", "u-1"));

            let store = MemoryStrategyStore::new();
            store.set_default_strategy(
                "u-1",
                PrincipalType::User,
                DefaultStrategy::new("s-u1", "default (u-1)"),
            );
            store.set_default_strategy(
                "u-2",
                PrincipalType::User,
                DefaultStrategy::new("s-u2", "default (u-2)"),
            );
            store.set_default_strategy(
                "g-1",
                PrincipalType::Group,
                DefaultStrategy::new("s-g1", "default (g-1)"),
            );

            Self {
                directory,
                store,
                trail: AuditTrail::new(),
            }
        }

        fn coordinator(
            &self,
            config: AuthConfig,
        ) -> LinkageCoordinator<&MemoryDirectory, &MemoryStrategyStore, &AuditTrail> {
            LinkageCoordinator::new(config, &self.directory, &self.store, &self.trail)
        }
    }

    fn service_attachments(operator: OperatorInfo) -> ResourceLinkageAttachments {
        ResourceLinkageAttachments::new()
            .with_operator(operator)
            .with_resource(ResourceType::Service, ResourceEntry::new("r-1", "svc-a"))
    }

    #[test]
    fn disabled_auth_is_a_complete_no_op() {
        let fixture = Fixture::new();
        let config = AuthConfig {
            console_auth_enabled: false,
            client_auth_enabled: false,
            ..AuthConfig::default()
        };
        let coordinator = fixture.coordinator(config);

        let ctx = AcquireContext::new(Operation::Create, Origin::Console)
            .with_attachments(service_attachments(OperatorInfo::user("u-1")));
        coordinator.after_resource_operation(&ctx).unwrap();

        assert_eq!(fixture.directory.lookups(), 0);
        assert_eq!(fixture.store.add_calls(), 0);
        assert_eq!(fixture.store.remove_calls(), 0);
        assert!(fixture.trail.is_empty());
    }

    #[test]
    fn missing_operator_info_is_a_no_op() {
        let fixture = Fixture::new();
        let coordinator = fixture.coordinator(AuthConfig::default());

        let attachments = ResourceLinkageAttachments::new()
            .with_resource(ResourceType::Service, ResourceEntry::new("r-1", "svc-a"));
        let ctx =
            AcquireContext::new(Operation::Create, Origin::Console).with_attachments(attachments);
        coordinator.after_resource_operation(&ctx).unwrap();

        assert_eq!(fixture.store.add_calls(), 0);
    }

    #[test]
    fn anonymous_operator_records_no_ownership() {
        let fixture = Fixture::new();
        let coordinator = fixture.coordinator(AuthConfig::default());

        let ctx = AcquireContext::new(Operation::Create, Origin::Console)
            .with_attachments(service_attachments(OperatorInfo::user("")));
        coordinator.after_resource_operation(&ctx).unwrap();

        assert_eq!(fixture.directory.lookups(), 0);
        assert_eq!(fixture.store.add_calls(), 0);
    }

    #[test]
    fn create_grants_the_creator_implicit_ownership() {
        let fixture = Fixture::new();
        let coordinator = fixture.coordinator(AuthConfig::default());

        let ctx = AcquireContext::new(Operation::Create, Origin::Console)
            .with_attachments(service_attachments(OperatorInfo::user("u-1")));
        coordinator.after_resource_operation(&ctx).unwrap();

        assert!(fixture.store.contains("s-u1", ResourceType::Service, "r-1"));
        assert_eq!(fixture.trail.len(), 1);
    }

    #[test]
    fn group_token_creator_lands_in_the_group_list() {
        let fixture = Fixture::new();
        let coordinator = fixture.coordinator(AuthConfig::default());

        let ctx = AcquireContext::new(Operation::Create, Origin::Console)
            .with_attachments(service_attachments(OperatorInfo::group("g-1")));
        coordinator.after_resource_operation(&ctx).unwrap();

        assert!(fixture.store.contains("s-g1", ResourceType::Service, "r-1"));
    }

    #[test]
    fn update_does_not_append_the_operator() {
        let fixture = Fixture::new();
        let coordinator = fixture.coordinator(AuthConfig::default());

        let ctx = AcquireContext::new(Operation::Update, Origin::Console)
            .with_attachments(service_attachments(OperatorInfo::user("u-1")));
        coordinator.after_resource_operation(&ctx).unwrap();

        // No explicit lists and no implicit creator: nothing to do.
        assert_eq!(fixture.store.add_calls(), 0);
        assert!(fixture.trail.is_empty());
    }

    #[test]
    fn explicit_lists_link_and_unlink() {
        let fixture = Fixture::new();
        fixture
            .store
            .insert_binding("s-u2", ResourceType::Service, "r-1");
        let coordinator = fixture.coordinator(AuthConfig::default());

        let mut attachments = service_attachments(OperatorInfo::user("u-1"));
        attachments.add_groups = vec!["g-1".to_string()];
        attachments.remove_users = vec!["u-2".to_string()];
        let ctx =
            AcquireContext::new(Operation::Update, Origin::Console).with_attachments(attachments);
        coordinator.after_resource_operation(&ctx).unwrap();

        assert!(fixture.store.contains("s-g1", ResourceType::Service, "r-1"));
        assert!(!fixture.store.contains("s-u2", ResourceType::Service, "r-1"));
    }

    #[test]
    fn failure_aborts_later_steps_without_rollback() {
        let fixture = Fixture::new();
        let coordinator = fixture.coordinator(AuthConfig::default());

        let mut attachments = service_attachments(OperatorInfo::user("u-1"));
        // add-groups fails to resolve, so remove-users must never run.
        attachments.add_groups = vec!["g-missing".to_string()];
        attachments.remove_users = vec!["u-2".to_string()];
        fixture
            .store
            .insert_binding("s-u2", ResourceType::Service, "r-1");

        let ctx =
            AcquireContext::new(Operation::Create, Origin::Console).with_attachments(attachments);
        let err = coordinator.after_resource_operation(&ctx).unwrap_err();

        assert!(matches!(err, LinkageError::PrincipalNotFound { .. }));
        // The add-users step already ran and stays applied.
        assert!(fixture.store.contains("s-u1", ResourceType::Service, "r-1"));
        // The remove step never ran.
        assert!(fixture.store.contains("s-u2", ResourceType::Service, "r-1"));
        assert_eq!(fixture.store.remove_calls(), 0);
    }

    #[test]
    fn client_origin_respects_client_auth_flag() {
        let fixture = Fixture::new();
        let coordinator = fixture.coordinator(AuthConfig::default());

        // Default config: client auth off.
        let ctx = AcquireContext::new(Operation::Create, Origin::Client)
            .with_attachments(service_attachments(OperatorInfo::user("u-1")));
        coordinator.after_resource_operation(&ctx).unwrap();

        assert_eq!(fixture.store.add_calls(), 0);
    }

    #[test]
    fn delete_audits_with_delete_kind() {
        let fixture = Fixture::new();
        fixture
            .store
            .insert_binding("s-u1", ResourceType::Service, "r-1");
        let coordinator = fixture.coordinator(AuthConfig::default());

        let mut attachments = service_attachments(OperatorInfo::user("u-1"));
        attachments.remove_users = vec!["u-1".to_string()];
        let ctx =
            AcquireContext::new(Operation::Delete, Origin::Console).with_attachments(attachments);
        coordinator.after_resource_operation(&ctx).unwrap();

        assert_eq!(fixture.store.binding_count(), 0);
        assert!(fixture
            .trail
            .entries()
            .iter()
            .all(|e| e.operation == OperationType::Delete));
    }
}
