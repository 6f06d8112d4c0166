//! The group coordinator router itself.
//!
//! [`GroupRouter`] holds only immutable references to its collaborators
//! (`spec.md` §3: "The router holds no mutable state") and is constructed
//! once per execution core. Every public method is one of the operations of
//! `spec.md` §4.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::{oneshot, Mutex as AsyncMutex};
use tracing::{debug, instrument, trace, warn};

use crate::error::{KafkaErrorCode, RouterError};
use crate::router::domain_types::{CoreId, GroupId, RoutingDecision};
use crate::router::requests::{
    AbortTxRequest, AbortTxResponse, BeginTxRequest, BeginTxResponse, CommitTxRequest,
    CommitTxResponse, DeletableGroupResult, DescribeGroupRequest, DescribeGroupResponse,
    HeartbeatRequest, HeartbeatResponse, JoinGroupRequest, JoinGroupResponse, LeaveGroupRequest,
    LeaveGroupResponse, ListedGroup, OffsetCommitRequest, OffsetCommitResponse,
    OffsetFetchRequest, OffsetFetchResponse, PrepareTxRequest, PrepareTxResponse, SyncGroupRequest,
    SyncGroupResponse, TxnOffsetCommitRequest, TxnOffsetCommitResponse,
};
use crate::router::traits::{
    CoordinatorMapper, CrossCoreExecutor, GroupManager, RoutableRequest, RoutableResponse,
    SchedulingGroup, SchedulingGroupController, ShardTable, SubmissionServiceGroup,
};

/// Dispatched-signal half of a two-stage offset commit: resolves once the
/// owning core's group manager has accepted the commit.
pub type DispatchedSignal = oneshot::Receiver<Result<(), RouterError>>;

/// Committed-signal half of a two-stage offset commit: resolves once the
/// commit has durably replicated.
pub type CommittedSignal = oneshot::Receiver<Result<OffsetCommitResponse, RouterError>>;

/// The group coordinator router.
///
/// One instance exists per execution core (`local_core`); it holds
/// immutable references to the mapper, shard table, and the full set of
/// per-core group-manager handles, plus the scheduling group and submission
/// service group all routed work runs under.
pub struct GroupRouter<X>
where
    X: CrossCoreExecutor + SchedulingGroupController,
{
    local_core: CoreId,
    mapper: Arc<dyn CoordinatorMapper>,
    shard_table: Arc<dyn ShardTable>,
    group_managers: Arc<Vec<Arc<dyn GroupManager>>>,
    executor: Arc<X>,
    scheduling_group: SchedulingGroup,
    submission_service_group: SubmissionServiceGroup,
}

impl<X> GroupRouter<X>
where
    X: CrossCoreExecutor + SchedulingGroupController + 'static,
{
    /// Builds a router instance for `local_core`.
    ///
    /// `group_managers` must have one entry per execution core, indexed by
    /// `CoreId`.
    #[must_use]
    pub fn new(
        local_core: CoreId,
        mapper: Arc<dyn CoordinatorMapper>,
        shard_table: Arc<dyn ShardTable>,
        group_managers: Arc<Vec<Arc<dyn GroupManager>>>,
        executor: Arc<X>,
        scheduling_group: SchedulingGroup,
        submission_service_group: SubmissionServiceGroup,
    ) -> Self {
        Self {
            local_core,
            mapper,
            shard_table,
            group_managers,
            executor,
            scheduling_group,
            submission_service_group,
        }
    }

    /// Resolves `group` to the partition id it hashes to and the core
    /// currently owning that partition, or `None` if either lookup fails.
    ///
    /// Stateless and reentrant; the result is a snapshot (`spec.md` §4.5).
    #[must_use]
    pub fn shard_for(&self, group: &GroupId) -> Option<RoutingDecision> {
        let partition = self.mapper.partition_id_for(group)?;
        let core = self.shard_table.core_for(&partition)?;
        Some(RoutingDecision { partition, core })
    }

    /// The routing primitive of `spec.md` §4.1, shared by every single-group
    /// operation. `call` invokes the right `GroupManager` method on the
    /// destination core's handle.
    async fn route_single<R, Resp, F>(&self, mut request: R, call: F) -> Result<Resp, RouterError>
    where
        R: RoutableRequest,
        Resp: RoutableResponse<Request = R>,
        F: FnOnce(Arc<dyn GroupManager>, R) -> BoxFuture<'static, Resp> + Send + 'static,
    {
        let Some(decision) = self.shard_for(request.group()) else {
            warn!(group = %request.group(), "no coordinator mapping, not routing");
            return Ok(Resp::not_coordinator(&request));
        };
        request.set_partition(decision.partition);

        let manager = Arc::clone(&self.group_managers[usize::from(decision.core)]);
        let executor = Arc::clone(&self.executor);
        let submission_group = self.submission_service_group;
        let destination = decision.core;

        trace!(
            group = %request.group(),
            core = usize::from(destination),
            "routing to destination core"
        );

        self.executor
            .with_scheduling_group(self.scheduling_group, move || {
                Box::pin(async move {
                    executor
                        .invoke_on(destination, submission_group, move || call(manager, request))
                        .await
                })
            })
            .await
    }

    /// Routes a `JoinGroup` request.
    #[instrument(skip(self, request), fields(group = %request.group))]
    pub async fn join_group(
        &self,
        request: JoinGroupRequest,
    ) -> Result<JoinGroupResponse, RouterError> {
        self.route_single(request, |manager, request| {
            Box::pin(async move { manager.join_group(request).await })
        })
        .await
    }

    /// Routes a `SyncGroup` request.
    #[instrument(skip(self, request), fields(group = %request.group))]
    pub async fn sync_group(
        &self,
        request: SyncGroupRequest,
    ) -> Result<SyncGroupResponse, RouterError> {
        self.route_single(request, |manager, request| {
            Box::pin(async move { manager.sync_group(request).await })
        })
        .await
    }

    /// Routes a `Heartbeat` request.
    #[instrument(skip(self, request), fields(group = %request.group))]
    pub async fn heartbeat(
        &self,
        request: HeartbeatRequest,
    ) -> Result<HeartbeatResponse, RouterError> {
        self.route_single(request, |manager, request| {
            Box::pin(async move { manager.heartbeat(request).await })
        })
        .await
    }

    /// Routes a `LeaveGroup` request.
    #[instrument(skip(self, request), fields(group = %request.group))]
    pub async fn leave_group(
        &self,
        request: LeaveGroupRequest,
    ) -> Result<LeaveGroupResponse, RouterError> {
        self.route_single(request, |manager, request| {
            Box::pin(async move { manager.leave_group(request).await })
        })
        .await
    }

    /// Routes an `OffsetFetch` request.
    #[instrument(skip(self, request), fields(group = %request.group))]
    pub async fn offset_fetch(
        &self,
        request: OffsetFetchRequest,
    ) -> Result<OffsetFetchResponse, RouterError> {
        self.route_single(request, |manager, request| {
            Box::pin(async move { manager.offset_fetch(request).await })
        })
        .await
    }

    /// Routes a `DescribeGroup` request.
    #[instrument(skip(self, request), fields(group = %request.group))]
    pub async fn describe_group(
        &self,
        request: DescribeGroupRequest,
    ) -> Result<DescribeGroupResponse, RouterError> {
        self.route_single(request, |manager, request| {
            Box::pin(async move { manager.describe_group(request).await })
        })
        .await
    }

    /// Routes a `TxnOffsetCommit` request.
    #[instrument(skip(self, request), fields(group = %request.group))]
    pub async fn txn_offset_commit(
        &self,
        request: TxnOffsetCommitRequest,
    ) -> Result<TxnOffsetCommitResponse, RouterError> {
        self.route_single(request, |manager, request| {
            Box::pin(async move { manager.txn_offset_commit(request).await })
        })
        .await
    }

    /// Routes a `BeginTx` request.
    #[instrument(skip(self, request), fields(group = %request.group))]
    pub async fn begin_tx(&self, request: BeginTxRequest) -> Result<BeginTxResponse, RouterError> {
        self.route_single(request, |manager, request| {
            Box::pin(async move { manager.begin_tx(request).await })
        })
        .await
    }

    /// Routes a `PrepareTx` request.
    #[instrument(skip(self, request), fields(group = %request.group))]
    pub async fn prepare_tx(
        &self,
        request: PrepareTxRequest,
    ) -> Result<PrepareTxResponse, RouterError> {
        self.route_single(request, |manager, request| {
            Box::pin(async move { manager.prepare_tx(request).await })
        })
        .await
    }

    /// Routes a `CommitTx` request.
    #[instrument(skip(self, request), fields(group = %request.group))]
    pub async fn commit_tx(
        &self,
        request: CommitTxRequest,
    ) -> Result<CommitTxResponse, RouterError> {
        self.route_single(request, |manager, request| {
            Box::pin(async move { manager.commit_tx(request).await })
        })
        .await
    }

    /// Routes an `AbortTx` request.
    #[instrument(skip(self, request), fields(group = %request.group))]
    pub async fn abort_tx(&self, request: AbortTxRequest) -> Result<AbortTxResponse, RouterError> {
        self.route_single(request, |manager, request| {
            Box::pin(async move { manager.abort_tx(request).await })
        })
        .await
    }

    /// Two-stage offset commit (`spec.md` §4.2).
    ///
    /// Returns immediately once the dispatch to the owning core has either
    /// resolved to a `(dispatched, committed)` signal pair or failed to
    /// resolve a coordinator at all. Both source-side signals resolve on
    /// `self.local_core`, even though the events that resolve them
    /// originate on the destination core, via a single fire-and-forget
    /// relay task (`submit_to`) that awaits the destination's dispatched
    /// signal, forwards it, then awaits the destination's committed signal
    /// and forwards that — so "dispatched resolves no later than committed"
    /// holds by program order, not by racing two independent tasks.
    #[instrument(skip(self, request), fields(group = %request.group))]
    pub async fn offset_commit(
        &self,
        mut request: OffsetCommitRequest,
    ) -> (DispatchedSignal, CommittedSignal) {
        let Some(decision) = self.shard_for(&request.group) else {
            warn!(group = %request.group, "no coordinator mapping for offset commit");
            let (dispatched_tx, dispatched_rx) = oneshot::channel();
            let _ = dispatched_tx.send(Ok(()));
            let (committed_tx, committed_rx) = oneshot::channel();
            let _ = committed_tx.send(Ok(OffsetCommitResponse::not_coordinator(&request)));
            return (dispatched_rx, committed_rx);
        };
        request.set_partition(decision.partition);

        let manager = Arc::clone(&self.group_managers[usize::from(decision.core)]);
        let executor = Arc::clone(&self.executor);
        let destination = decision.core;
        let submission_group = self.submission_service_group;

        let dispatch_result = self
            .executor
            .with_scheduling_group(self.scheduling_group, move || {
                Box::pin(async move {
                    executor
                        .invoke_on(destination, submission_group, move || {
                            Box::pin(async move { manager.offset_commit(request).await })
                        })
                        .await
                })
            })
            .await;

        match dispatch_result {
            Ok(destination_signal) => {
                let (dispatched_tx, dispatched_rx) = oneshot::channel();
                let (committed_tx, committed_rx) = oneshot::channel();
                let local_core = self.local_core;
                let destination_dispatched = destination_signal.dispatched;
                let destination_committed = destination_signal.committed;
                // Fire-and-forget: resolves the *source* core's dispatched
                // and committed signals once the destination's own signals
                // resolve, without the caller awaiting anything on the
                // destination. Both relays run sequentially in one task so
                // the dispatched-then-committed ordering is a consequence of
                // program order rather than two racing tasks.
                self.executor.submit_to(local_core, move || {
                    Box::pin(async move {
                        let dispatched_outcome = destination_dispatched.await.unwrap_or_else(|_| {
                            Err(RouterError::NotificationLost(
                                "destination dispatched sender dropped".to_string(),
                            ))
                        });
                        let _ = dispatched_tx.send(dispatched_outcome);

                        let committed_outcome = destination_committed.await.unwrap_or_else(|_| {
                            Err(RouterError::NotificationLost(
                                "destination committed sender dropped".to_string(),
                            ))
                        });
                        let _ = committed_tx.send(committed_outcome);
                    })
                });

                (dispatched_rx, committed_rx)
            }
            Err(dispatch_error) => {
                let (dispatched_tx, dispatched_rx) = oneshot::channel();
                let _ = dispatched_tx.send(Err(dispatch_error.clone()));
                let (committed_tx, committed_rx) = oneshot::channel();
                let _ = committed_tx.send(Err(dispatch_error));
                (dispatched_rx, committed_rx)
            }
        }
    }

    /// Fan-out `list_groups` (`spec.md` §4.3): invokes every core's group
    /// manager concurrently and reduces. The aggregate error kind is the
    /// first non-"none" value encountered in core-id order; there is no
    /// short-circuit, partial results are always merged.
    #[instrument(skip(self))]
    pub async fn list_groups(&self) -> (KafkaErrorCode, Vec<ListedGroup>) {
        let calls = (0..self.group_managers.len()).map(|index| {
            let core = CoreId::from(index);
            let manager = Arc::clone(&self.group_managers[index]);
            let executor = Arc::clone(&self.executor);
            let scheduling_executor = Arc::clone(&self.executor);
            let submission_group = self.submission_service_group;
            let scheduling_group = self.scheduling_group;
            async move {
                scheduling_executor
                    .with_scheduling_group(scheduling_group, move || {
                        Box::pin(async move {
                            executor
                                .invoke_on(core, submission_group, move || {
                                    Box::pin(async move { manager.list_groups().await })
                                })
                                .await
                        })
                    })
                    .await
            }
        });

        let partials = futures::future::join_all(calls).await;

        let mut aggregate_error = KafkaErrorCode::None;
        let mut groups = Vec::new();
        for partial in partials {
            match partial {
                Ok((error, mut core_groups)) => {
                    if aggregate_error.is_none() && !error.is_none() {
                        aggregate_error = error;
                    }
                    groups.append(&mut core_groups);
                }
                Err(dispatch_error) => {
                    debug!(%dispatch_error, "core unreachable during list_groups fan-out");
                    if aggregate_error.is_none() {
                        aggregate_error = KafkaErrorCode::Other(-1);
                    }
                }
            }
        }
        (aggregate_error, groups)
    }

    /// Fan-out `delete_groups` (`spec.md` §4.4): buckets inputs by owning
    /// core, dispatches one cross-core call per populated bucket in
    /// parallel, and merges results under a mutex as each bucket completes.
    /// Groups with no routing decision never touch a cross-core path.
    #[instrument(skip(self, groups))]
    pub async fn delete_groups(&self, groups: Vec<GroupId>) -> Vec<DeletableGroupResult> {
        let mut buckets: HashMap<CoreId, Vec<(crate::router::domain_types::PartitionId, GroupId)>> =
            HashMap::new();
        let mut unmapped = Vec::new();

        for group in groups {
            match self.shard_for(&group) {
                Some(decision) => buckets
                    .entry(decision.core)
                    .or_default()
                    .push((decision.partition, group)),
                None => unmapped.push(DeletableGroupResult {
                    group,
                    error: KafkaErrorCode::NotCoordinator,
                }),
            }
        }

        let aggregate = Arc::new(AsyncMutex::new(unmapped));

        let calls = buckets.into_iter().map(|(core, pairs)| {
            let manager = Arc::clone(&self.group_managers[usize::from(core)]);
            let executor = Arc::clone(&self.executor);
            let scheduling_executor = Arc::clone(&self.executor);
            let submission_group = self.submission_service_group;
            let scheduling_group = self.scheduling_group;
            let aggregate = Arc::clone(&aggregate);
            let pairs_for_failure: Vec<GroupId> =
                pairs.iter().map(|(_, group)| group.clone()).collect();

            async move {
                let result = scheduling_executor
                    .with_scheduling_group(scheduling_group, move || {
                        Box::pin(async move {
                            executor
                                .invoke_on(core, submission_group, move || {
                                    Box::pin(async move { manager.delete_groups(pairs).await })
                                })
                                .await
                        })
                    })
                    .await;

                let mut guard = aggregate.lock().await;
                match result {
                    Ok(mut results) => guard.append(&mut results),
                    Err(dispatch_error) => {
                        debug!(%dispatch_error, core = usize::from(core), "bucket failed during delete_groups fan-out");
                        guard.extend(pairs_for_failure.into_iter().map(|group| {
                            DeletableGroupResult {
                                group,
                                error: KafkaErrorCode::Other(-1),
                            }
                        }));
                    }
                }
            }
        });

        futures::future::join_all(calls).await;

        let mut guard = aggregate.lock().await;
        std::mem::take(&mut *guard)
    }
}
