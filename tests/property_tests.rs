//! Property tests for the linkage core.
//!
//! These validate the convergence semantics the hook's correctness rests
//! on: loose add and remove are idempotent, wildcard removal matches on
//! resource identity alone, and a creator always ends up linked to every
//! resource in the attachment map.

use policy_linkage::{
    AcquireContext, AuditTrail, AuthConfig, DefaultStrategy, LinkageCoordinator, MemoryDirectory,
    MemoryStrategyStore, Operation, OperatorInfo, Origin, PrincipalType, ResourceEntry,
    ResourceLinkageAttachments, ResourceType, StrategyResource, StrategyStore, UserRecord,
};
use proptest::prelude::*;

fn arb_resource_type() -> impl Strategy<Value = ResourceType> {
    prop_oneof![
        Just(ResourceType::Namespace),
        Just(ResourceType::Service),
        Just(ResourceType::ConfigGroup),
    ]
}

fn arb_binding() -> impl Strategy<Value = StrategyResource> {
    (
        prop::string::string_regex("s-[a-z0-9]{1,4}").unwrap(),
        arb_resource_type(),
        prop::string::string_regex("r-[a-z0-9]{1,4}").unwrap(),
    )
        .prop_map(|(strategy_id, resource_type, resource_id)| {
            StrategyResource::new(strategy_id, resource_type, resource_id)
        })
}

proptest! {
    /// Adding the same binding set twice converges to the same store state
    /// as adding it once, and never surfaces a duplicate-key error.
    #[test]
    fn proptest_loose_add_is_idempotent(
        bindings in prop::collection::vec(arb_binding(), 0..12)
    ) {
        let store = MemoryStrategyStore::new();

        store.loose_add(&bindings).unwrap();
        let after_once = store.bindings();

        store.loose_add(&bindings).unwrap();
        prop_assert_eq!(store.bindings(), after_once);
    }

    /// Removing bindings is unconditional: removing twice (or removing
    /// bindings that were never added) always succeeds and converges.
    #[test]
    fn proptest_remove_is_idempotent(
        present in prop::collection::vec(arb_binding(), 0..8),
        removed in prop::collection::vec(arb_binding(), 0..8)
    ) {
        let store = MemoryStrategyStore::new();
        store.loose_add(&present).unwrap();

        store.remove(&removed).unwrap();
        let after_once = store.bindings();

        store.remove(&removed).unwrap();
        prop_assert_eq!(store.bindings(), after_once);
    }

    /// A wildcard removal leaves no binding with the target resource
    /// identity, regardless of which strategy owned it, and touches no
    /// other resource.
    #[test]
    fn proptest_wildcard_remove_matches_resource_identity(
        bindings in prop::collection::vec(arb_binding(), 1..12),
        pick in 0usize..12
    ) {
        let store = MemoryStrategyStore::new();
        store.loose_add(&bindings).unwrap();

        let target = &bindings[pick % bindings.len()];
        let wildcard =
            StrategyResource::any_strategy(target.resource_type, target.resource_id.clone());
        store.remove(std::slice::from_ref(&wildcard)).unwrap();

        for (_, resource_type, resource_id) in store.bindings() {
            prop_assert!(
                resource_type != target.resource_type || resource_id != target.resource_id,
                "binding for removed resource survived"
            );
        }
    }

    /// Every Create run links the operator to every resource in the
    /// attachment map, however the resource list is shaped.
    #[test]
    fn proptest_create_links_operator_to_every_resource(
        resource_ids in prop::collection::btree_set(
            prop::string::string_regex("r-[a-z0-9]{1,6}").unwrap(),
            1..10
        ),
        resource_type in arb_resource_type()
    ) {
        let directory = MemoryDirectory::new();
        directory.add_user(UserRecord::new("u-1", "Alice", ""));

        let store = MemoryStrategyStore::new();
        store.set_default_strategy(
            "u-1",
            PrincipalType::User,
            DefaultStrategy::new("s-u1", "default (u-1)"),
        );

        let trail = AuditTrail::new();
        let coordinator =
            LinkageCoordinator::new(AuthConfig::default(), &directory, &store, &trail);

        let mut attachments =
            ResourceLinkageAttachments::new().with_operator(OperatorInfo::user("u-1"));
        for id in &resource_ids {
            attachments = attachments
                .with_resource(resource_type, ResourceEntry::new(id.clone(), id.clone()));
        }

        let ctx = AcquireContext::new(Operation::Create, Origin::Console)
            .with_attachments(attachments);
        coordinator.after_resource_operation(&ctx).unwrap();

        prop_assert_eq!(store.binding_count(), resource_ids.len());
        for id in &resource_ids {
            prop_assert!(store.contains("s-u1", resource_type, id));
        }
        prop_assert_eq!(trail.len(), 1);
    }
}
