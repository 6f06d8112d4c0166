//! Trait definitions for the router's collaborators and for the routed
//! request/response shape, following the teacher crate's pattern of keeping
//! the external-collaborator interfaces and the router's own error type in
//! one `traits` module (see `message_router/traits.rs`).

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::error::RouterError;
use crate::router::domain_types::{CoreId, GroupId, PartitionId};
use crate::router::requests::{DeletableGroupResult, ListedGroup};

/// Capability set required of every routed request (`spec.md` §9,
/// "Polymorphism"): a `group()` accessor and a writable partition-id slot.
pub trait RoutableRequest: Send + 'static {
    /// The group identifier this request is addressed to.
    fn group(&self) -> &GroupId;

    /// Writes the resolved partition id onto the request, before the
    /// cross-core hop (`spec.md` §3, invariant 2).
    fn set_partition(&mut self, partition: PartitionId);
}

/// Capability set required of every routed response: a constructor from
/// `(request, error kind)` that produces a well-formed "not coordinator"
/// reply (`spec.md` §3, invariant 4).
pub trait RoutableResponse: Send + 'static {
    /// The paired request type.
    type Request: RoutableRequest;

    /// Synthesizes a "not coordinator" response without ever calling the
    /// group manager.
    fn not_coordinator(request: &Self::Request) -> Self;
}

/// Pure, non-blocking, non-suspending mapping from a group identifier to the
/// partition id of the internal offsets topic it hashes to.
///
/// Implementations must be deterministic: repeated queries with the same
/// group identifier yield the same result (`spec.md` §3, invariant 1).
pub trait CoordinatorMapper: Send + Sync {
    /// Resolves `group` to a partition id, or `None` if the mapper cannot
    /// resolve it (e.g. the internal topic has not been created yet).
    fn partition_id_for(&self, group: &GroupId) -> Option<PartitionId>;
}

/// Per-core view of partition ownership. Pure relative to a snapshot of
/// cluster membership; a lookup never suspends.
pub trait ShardTable: Send + Sync {
    /// Resolves `partition` to the core currently owning its replica, or
    /// `None` if ownership is not locally known.
    fn core_for(&self, partition: &PartitionId) -> Option<CoreId>;
}

/// The two-stage completion signal pair returned by the group manager's
/// `offset_commit`: resolves once the request is *dispatched* (accepted and
/// scheduled for durable replication) and again once it is *committed*
/// (replication reached the required durability). See `spec.md` §4.2.
pub struct TwoStageSignal<D, C> {
    /// Resolves when the operation has been accepted by the owning core.
    pub dispatched: oneshot::Receiver<Result<D, RouterError>>,
    /// Resolves when the operation has durably committed.
    pub committed: oneshot::Receiver<Result<C, RouterError>>,
}

/// The sharded group-state manager: one instance per execution core, holding
/// the authoritative state for every group whose coordinator partition is
/// owned by that core. Implemented outside this crate in production; the
/// router only ever calls it through this trait (`spec.md` §6).
#[async_trait]
pub trait GroupManager: Send + Sync {
    /// Request/response types this manager speaks; expressed as associated
    /// types would require one trait per operation, so instead every method
    /// below is generic over the `RoutableRequest`/`RoutableResponse` pair it
    /// needs, matching the routing primitive's own polymorphism.
    async fn join_group(
        &self,
        request: crate::router::requests::JoinGroupRequest,
    ) -> crate::router::requests::JoinGroupResponse;

    /// Handles a `SyncGroup` request.
    async fn sync_group(
        &self,
        request: crate::router::requests::SyncGroupRequest,
    ) -> crate::router::requests::SyncGroupResponse;

    /// Handles a `Heartbeat` request.
    async fn heartbeat(
        &self,
        request: crate::router::requests::HeartbeatRequest,
    ) -> crate::router::requests::HeartbeatResponse;

    /// Handles a `LeaveGroup` request.
    async fn leave_group(
        &self,
        request: crate::router::requests::LeaveGroupRequest,
    ) -> crate::router::requests::LeaveGroupResponse;

    /// Handles an `OffsetFetch` request.
    async fn offset_fetch(
        &self,
        request: crate::router::requests::OffsetFetchRequest,
    ) -> crate::router::requests::OffsetFetchResponse;

    /// Handles a `DescribeGroup` request.
    async fn describe_group(
        &self,
        request: crate::router::requests::DescribeGroupRequest,
    ) -> crate::router::requests::DescribeGroupResponse;

    /// Handles a `TxnOffsetCommit` request.
    async fn txn_offset_commit(
        &self,
        request: crate::router::requests::TxnOffsetCommitRequest,
    ) -> crate::router::requests::TxnOffsetCommitResponse;

    /// Handles a `BeginTx` request.
    async fn begin_tx(
        &self,
        request: crate::router::requests::BeginTxRequest,
    ) -> crate::router::requests::BeginTxResponse;

    /// Handles a `PrepareTx` request.
    async fn prepare_tx(
        &self,
        request: crate::router::requests::PrepareTxRequest,
    ) -> crate::router::requests::PrepareTxResponse;

    /// Handles a `CommitTx` request.
    async fn commit_tx(
        &self,
        request: crate::router::requests::CommitTxRequest,
    ) -> crate::router::requests::CommitTxResponse;

    /// Handles an `AbortTx` request.
    async fn abort_tx(
        &self,
        request: crate::router::requests::AbortTxRequest,
    ) -> crate::router::requests::AbortTxResponse;

    /// Two-stage offset commit: returns as soon as the request is accepted
    /// and scheduled, carrying the pair of signals the router chains back
    /// to the calling core (`spec.md` §4.2).
    async fn offset_commit(
        &self,
        request: crate::router::requests::OffsetCommitRequest,
    ) -> TwoStageSignal<(), crate::router::requests::OffsetCommitResponse>;

    /// Lists every group this core's manager currently knows about.
    ///
    /// Returns the manager's own error kind (e.g. "loading") alongside the
    /// groups it does have, rather than failing outright — the router's
    /// fan-out reduction (`spec.md` §4.3) depends on partial results always
    /// being usable.
    async fn list_groups(&self) -> (crate::error::KafkaErrorCode, Vec<ListedGroup>);

    /// Deletes the given `(partition, group)` pairs, all owned by this core.
    async fn delete_groups(
        &self,
        groups: Vec<(PartitionId, GroupId)>,
    ) -> Vec<DeletableGroupResult>;
}

/// Bounded-concurrency handle governing the number of concurrent in-flight
/// cross-core calls (`spec.md` §5, "submission service group").
#[derive(Debug, Clone, Copy)]
pub struct SubmissionServiceGroup {
    /// Opaque identifier, meaningful only to the executor that issued it.
    pub id: usize,
}

/// CPU-accounting and preemption-class handle under which routed work
/// executes on the destination core (`spec.md` §5, "scheduling group").
#[derive(Debug, Clone, Copy)]
pub struct SchedulingGroup {
    /// Opaque identifier, meaningful only to the executor that issued it.
    pub id: usize,
}

/// Cross-core dispatch primitives. An implementation owns the mapping from
/// `CoreId` to the destination core's actual task/thread and is the only
/// component in this crate allowed to move work across that boundary.
#[async_trait]
pub trait CrossCoreExecutor: Send + Sync {
    /// Runs `task` on `core`, inside `submission_group`'s bounded
    /// concurrency, and returns its result. This is always a suspension
    /// point for the caller.
    async fn invoke_on<F, T>(
        &self,
        core: CoreId,
        submission_group: SubmissionServiceGroup,
        task: F,
    ) -> Result<T, RouterError>
    where
        F: FnOnce() -> futures::future::BoxFuture<'static, T> + Send + 'static,
        T: Send + 'static;

    /// Fire-and-forget one-way submission to `core`; the caller does not
    /// await completion. Used for the two-stage commit's dispatched-signal
    /// notification (`spec.md` §4.2, step 5).
    fn submit_to<F>(&self, core: CoreId, task: F)
    where
        F: FnOnce() -> futures::future::BoxFuture<'static, ()> + Send + 'static;

    /// Number of cores this executor multiplexes onto.
    fn core_count(&self) -> usize;
}

/// Entry/exit accounting for a unit of routed work (`spec.md` §5,
/// "scheduling group"). Entering may suspend if the scheduler defers for
/// accounting purposes.
#[async_trait]
pub trait SchedulingGroupController: Send + Sync {
    /// Runs `task` while charging its CPU time to `group`.
    async fn with_scheduling_group<F, T>(&self, group: SchedulingGroup, task: F) -> T
    where
        F: FnOnce() -> futures::future::BoxFuture<'static, T> + Send + 'static,
        T: Send + 'static;
}
