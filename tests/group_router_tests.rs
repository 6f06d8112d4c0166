//! Integration tests for single-group routing and the two-stage offset
//! commit protocol.
#![allow(clippy::pedantic)]

mod common;

use common::Harness;
use shard_router::error::{KafkaErrorCode, RouterError};
use shard_router::router::domain_types::{CoreId, GroupId};
use shard_router::router::implementations::ScriptedCommitOutcome;
use shard_router::router::requests::{HeartbeatRequest, JoinGroupRequest, OffsetCommitRequest};
use shard_router::router::traits::GroupManager;

// S1: a heartbeat for a group with no coordinator mapping comes back as
// `NotCoordinator` instead of panicking or hanging.
#[tokio::test]
async fn unmapped_heartbeat_returns_not_coordinator() {
    let harness = Harness::with_unresolvable_mapper(2);
    let group = GroupId::from_str_name("orphan-group");

    let response = harness
        .router
        .heartbeat(HeartbeatRequest {
            group: group.clone(),
            partition: None,
            member_id: "m1".to_string(),
            generation_id: 1,
        })
        .await
        .expect("routing itself never fails for an unmapped group");

    assert_eq!(response.group, group);
    assert_eq!(response.error, KafkaErrorCode::NotCoordinator);
}

// S2: a join for a group with a resolved coordinator reaches the owning
// core's manager and comes back with no error.
#[tokio::test]
async fn mapped_join_group_succeeds() {
    let harness = Harness::new(3);
    let group = GroupId::from_str_name("consumer-group-a");
    harness.assign_group_to_core(&group, CoreId::from(1));

    let response = harness
        .router
        .join_group(JoinGroupRequest {
            group: group.clone(),
            partition: None,
            member_id: String::new(),
            rebalance_timeout_ms: 30_000,
        })
        .await
        .expect("dispatch to a mapped, reachable core succeeds");

    assert_eq!(response.group, group);
    assert_eq!(response.error, KafkaErrorCode::None);
    assert!(response.generation_id >= 1);
    assert!(!response.member_id.is_empty());
}

// Universal property: routing a group twice yields the same partition/core
// pair, since neither the mapper nor the shard table changed in between.
#[tokio::test]
async fn shard_for_is_deterministic_across_repeated_calls() {
    let harness = Harness::new(4);
    let group = GroupId::from_str_name("stable-group");
    harness.assign_group_to_core(&group, CoreId::from(2));

    let first = harness.router.shard_for(&group);
    let second = harness.router.shard_for(&group);
    assert_eq!(first, second);
    assert_eq!(first.unwrap().core, CoreId::from(2));
}

// Universal property: a response for a mapped group always echoes the
// group id it was routed under, unchanged.
#[tokio::test]
async fn responses_echo_the_routed_group_unchanged() {
    let harness = Harness::new(2);
    let group = GroupId::from_str_name("pass-through-group");
    harness.assign_group_to_core(&group, CoreId::from(0));

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

    assert_eq!(response.group, group);
}

// Universal property: an unmapped group never reaches any group manager —
// a join for it leaves every manager's internal state untouched, so a
// later mapped join for the same identifier still starts at generation 1.
#[tokio::test]
async fn unmapped_request_never_touches_a_group_manager() {
    let harness = Harness::with_unresolvable_mapper(1);
    let group = GroupId::from_str_name("never-dispatched");

    let _ = harness
        .router
        .join_group(JoinGroupRequest {
            group: group.clone(),
            partition: None,
            member_id: String::new(),
            rebalance_timeout_ms: 30_000,
        })
        .await
        .unwrap();

    // No manager in this harness ever saw the group, so it reports nothing
    // seeded for it.
    let (_, groups) = harness.managers[0].list_groups().await;
    assert!(groups.iter().all(|g| g.group != group));
}

// S3: the happy path of a two-stage offset commit resolves both signals
// with success.
#[tokio::test]
async fn offset_commit_happy_path_resolves_both_stages() {
    let harness = Harness::new(2);
    let group = GroupId::from_str_name("committing-group");
    let core = harness.assign_group_to_core(&group, CoreId::from(1));
    let _ = core;

    let (dispatched, committed) = harness
        .router
        .offset_commit(OffsetCommitRequest {
            group: group.clone(),
            partition: None,
            offsets: vec![("topic-a".to_string(), 42)],
        })
        .await;

    let dispatched_outcome = dispatched.await.expect("dispatched sender not dropped");
    assert!(dispatched_outcome.is_ok());

    let committed_outcome = committed.await.expect("committed sender not dropped");
    let response = committed_outcome.expect("commit scripted to succeed");
    assert_eq!(response.group, group);
    assert_eq!(response.error, KafkaErrorCode::None);
}

// S4: when the destination's commit dispatch fails, both the dispatched and
// committed signals surface the same failure instead of hanging or
// silently succeeding.
#[tokio::test]
async fn offset_commit_destination_dispatch_failure_propagates_to_both_stages() {
    let harness = Harness::new(2);
    let group = GroupId::from_str_name("failing-commit-group");
    harness.assign_group_to_core(&group, CoreId::from(1));
    harness.managers[1].set_commit_outcome(ScriptedCommitOutcome::DispatchFails(
        "replication quorum unavailable".to_string(),
    ));

    let (dispatched, committed) = harness
        .router
        .offset_commit(OffsetCommitRequest {
            group: group.clone(),
            partition: None,
            offsets: vec![("topic-a".to_string(), 1)],
        })
        .await;

    let dispatched_outcome = dispatched.await.unwrap();
    assert!(matches!(
        dispatched_outcome,
        Err(RouterError::GroupManager(_))
    ));

    let committed_outcome = committed.await.unwrap();
    assert!(matches!(
        committed_outcome,
        Err(RouterError::GroupManager(_))
    ));
}

// Early-failure shape: an offset commit for an unmapped group resolves both
// signals immediately, without ever reaching a group manager — dispatched
// succeeds trivially and committed carries a synthesized `NotCoordinator`.
#[tokio::test]
async fn offset_commit_for_unmapped_group_resolves_immediately() {
    let harness = Harness::with_unresolvable_mapper(2);
    let group = GroupId::from_str_name("nowhere-group");

    let (dispatched, committed) = harness
        .router
        .offset_commit(OffsetCommitRequest {
            group: group.clone(),
            partition: None,
            offsets: Vec::new(),
        })
        .await;

    assert!(dispatched.await.unwrap().is_ok());
    let response = committed.await.unwrap().unwrap();
    assert_eq!(response.group, group);
    assert_eq!(response.error, KafkaErrorCode::NotCoordinator);
}
