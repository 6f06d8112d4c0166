//! Property-based tests for the stateless-routing and pass-through
//! invariants, over arbitrary group identifiers and core counts.
#![allow(clippy::pedantic)]

mod common;

use common::Harness;
use proptest::prelude::*;
use shard_router::router::domain_types::{CoreId, GroupId};
use shard_router::router::requests::HeartbeatRequest;

fn route_heartbeat(core_count: usize, group_name: String) -> (GroupId, bool, bool) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(async move {
        let harness = Harness::new(core_count);
        let group = GroupId::from_str_name(group_name);
        let decision_before = harness.router.shard_for(&group);

        let owner = decision_before
            .map(|d| d.core)
            .unwrap_or(CoreId::from(0));
        harness.assign_group_to_core(&group, owner);

        let decision_after_first = harness.router.shard_for(&group);
        let decision_after_second = harness.router.shard_for(&group);
        let deterministic = decision_after_first == decision_after_second;

        let response = harness
            .router
            .heartbeat(HeartbeatRequest {
                group: group.clone(),
                partition: None,
                member_id: "m".to_string(),
                generation_id: 1,
            })
            .await
            .unwrap();
        let echoed = response.group == group;

        (group, deterministic, echoed)
    })
}

proptest! {
    // Universal property (spec.md §8, property 1): routing the same group
    // identifier twice in a row, with cluster state held fixed, always
    // yields the same routing decision.
    #[test]
    fn shard_for_is_deterministic_for_arbitrary_groups(
        group_name in "[a-zA-Z0-9._-]{1,64}",
        core_count in 1usize..8,
    ) {
        let (_, deterministic, _) = route_heartbeat(core_count, group_name);
        prop_assert!(deterministic);
    }

    // Universal property (spec.md §8, property 2): a routed response always
    // echoes back the exact group identifier it was addressed to.
    #[test]
    fn routed_responses_always_echo_their_group(
        group_name in "[a-zA-Z0-9._-]{1,64}",
        core_count in 1usize..8,
    ) {
        let (_, _, echoed) = route_heartbeat(core_count, group_name);
        prop_assert!(echoed);
    }
}
