//! A minimal in-memory group manager, standing in for the real
//! join/sync/heartbeat state machine and offset log that `spec.md` §1
//! declares out of scope.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::oneshot;

use crate::error::{KafkaErrorCode, RouterError, TxnErrorCode};
use crate::router::domain_types::{GroupId, PartitionId};
use crate::router::requests::{
    AbortTxRequest, AbortTxResponse, BeginTxRequest, BeginTxResponse, CommitTxRequest,
    CommitTxResponse, DeletableGroupResult, DescribeGroupRequest, DescribeGroupResponse,
    HeartbeatRequest, HeartbeatResponse, JoinGroupRequest, JoinGroupResponse, LeaveGroupRequest,
    LeaveGroupResponse, ListedGroup, OffsetCommitRequest, OffsetCommitResponse,
    OffsetFetchRequest, OffsetFetchResponse, PrepareTxRequest, PrepareTxResponse, SyncGroupRequest,
    SyncGroupResponse, TxnOffsetCommitRequest, TxnOffsetCommitResponse,
};
use crate::router::traits::{GroupManager, TwoStageSignal};

/// Kafka's `COORDINATOR_LOAD_IN_PROGRESS` error code, reused here to model
/// "this core is still loading group metadata" for the `list_groups`
/// fan-out tests (`spec.md` §8, scenario S5).
pub const COORDINATOR_LOAD_IN_PROGRESS: i16 = 14;

/// How a scripted [`InMemoryGroupManager::offset_commit`] call should
/// resolve, so tests can exercise both the happy path (S3) and a failing
/// destination dispatch (S4) without needing a real offset log.
#[derive(Debug, Clone)]
pub enum ScriptedCommitOutcome {
    /// Both stages succeed.
    Success,
    /// The dispatched stage fails with the given message; the committed
    /// stage then also fails with the same message, mirroring a destination
    /// that never got to schedule the write.
    DispatchFails(String),
}

struct GroupState {
    generation: AtomicI32,
}

/// In-memory [`GroupManager`] for one execution core.
pub struct InMemoryGroupManager {
    groups: DashMap<GroupId, GroupState>,
    list_groups_error: Mutex<KafkaErrorCode>,
    commit_outcome: Mutex<ScriptedCommitOutcome>,
}

impl Default for InMemoryGroupManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGroupManager {
    /// A manager with no groups yet, reporting no errors.
    #[must_use]
    pub fn new() -> Self {
        Self {
            groups: DashMap::new(),
            list_groups_error: Mutex::new(KafkaErrorCode::None),
            commit_outcome: Mutex::new(ScriptedCommitOutcome::Success),
        }
    }

    /// Seeds a group as already known to this core, for `describe`/`list`
    /// tests.
    pub fn seed_group(&self, group: GroupId) {
        self.groups.insert(
            group,
            GroupState {
                generation: AtomicI32::new(0),
            },
        );
    }

    /// Makes this core's `list_groups` report `error` until changed again.
    pub fn set_list_groups_error(&self, error: KafkaErrorCode) {
        *self.list_groups_error.lock().unwrap() = error;
    }

    /// Scripts the outcome of the next `offset_commit` calls.
    pub fn set_commit_outcome(&self, outcome: ScriptedCommitOutcome) {
        *self.commit_outcome.lock().unwrap() = outcome;
    }
}

#[async_trait]
impl GroupManager for InMemoryGroupManager {
    async fn join_group(&self, request: JoinGroupRequest) -> JoinGroupResponse {
        let entry = self
            .groups
            .entry(request.group.clone())
            .or_insert_with(|| GroupState {
                generation: AtomicI32::new(0),
            });
        let generation = entry.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let member_id = if request.member_id.is_empty() {
            format!("member-{generation}")
        } else {
            request.member_id
        };
        JoinGroupResponse {
            group: request.group,
            error: KafkaErrorCode::None,
            generation_id: generation,
            member_id,
        }
    }

    async fn sync_group(&self, request: SyncGroupRequest) -> SyncGroupResponse {
        SyncGroupResponse {
            group: request.group,
            error: KafkaErrorCode::None,
            assignment: Vec::new(),
        }
    }

    async fn heartbeat(&self, request: HeartbeatRequest) -> HeartbeatResponse {
        HeartbeatResponse {
            group: request.group,
            error: KafkaErrorCode::None,
        }
    }

    async fn leave_group(&self, request: LeaveGroupRequest) -> LeaveGroupResponse {
        LeaveGroupResponse {
            group: request.group,
            error: KafkaErrorCode::None,
        }
    }

    async fn offset_fetch(&self, request: OffsetFetchRequest) -> OffsetFetchResponse {
        OffsetFetchResponse {
            group: request.group,
            error: KafkaErrorCode::None,
            offsets: Vec::new(),
        }
    }

    async fn describe_group(&self, request: DescribeGroupRequest) -> DescribeGroupResponse {
        let members = self
            .groups
            .get(&request.group)
            .map(|_| vec!["member-0".to_string()])
            .unwrap_or_default();
        DescribeGroupResponse {
            group: request.group,
            error: KafkaErrorCode::None,
            state: "Stable".to_string(),
            members,
        }
    }

    async fn txn_offset_commit(
        &self,
        request: TxnOffsetCommitRequest,
    ) -> TxnOffsetCommitResponse {
        TxnOffsetCommitResponse {
            group: request.group,
            error: TxnErrorCode::None,
        }
    }

    async fn begin_tx(&self, request: BeginTxRequest) -> BeginTxResponse {
        BeginTxResponse {
            group: request.group,
            error: TxnErrorCode::None,
        }
    }

    async fn prepare_tx(&self, request: PrepareTxRequest) -> PrepareTxResponse {
        PrepareTxResponse {
            group: request.group,
            error: TxnErrorCode::None,
        }
    }

    async fn commit_tx(&self, request: CommitTxRequest) -> CommitTxResponse {
        CommitTxResponse {
            group: request.group,
            error: TxnErrorCode::None,
        }
    }

    async fn abort_tx(&self, request: AbortTxRequest) -> AbortTxResponse {
        AbortTxResponse {
            group: request.group,
            error: TxnErrorCode::None,
        }
    }

    async fn offset_commit(
        &self,
        request: OffsetCommitRequest,
    ) -> TwoStageSignal<(), OffsetCommitResponse> {
        let (dispatched_tx, dispatched_rx) = oneshot::channel();
        let (committed_tx, committed_rx) = oneshot::channel();
        let outcome = self.commit_outcome.lock().unwrap().clone();
        let group = request.group;

        tokio::spawn(async move {
            match outcome {
                ScriptedCommitOutcome::Success => {
                    let _ = dispatched_tx.send(Ok(()));
                    let _ = committed_tx.send(Ok(OffsetCommitResponse {
                        group,
                        error: KafkaErrorCode::None,
                    }));
                }
                ScriptedCommitOutcome::DispatchFails(message) => {
                    let _ = dispatched_tx.send(Err(RouterError::GroupManager(message.clone())));
                    let _ = committed_tx.send(Err(RouterError::GroupManager(message)));
                }
            }
        });

        TwoStageSignal {
            dispatched: dispatched_rx,
            committed: committed_rx,
        }
    }

    async fn list_groups(&self) -> (KafkaErrorCode, Vec<ListedGroup>) {
        let error = *self.list_groups_error.lock().unwrap();
        let groups = self
            .groups
            .iter()
            .map(|entry| ListedGroup {
                group: entry.key().clone(),
                protocol_type: "consumer".to_string(),
            })
            .collect();
        (error, groups)
    }

    async fn delete_groups(
        &self,
        groups: Vec<(PartitionId, GroupId)>,
    ) -> Vec<DeletableGroupResult> {
        groups
            .into_iter()
            .map(|(_partition, group)| {
                self.groups.remove(&group);
                DeletableGroupResult {
                    group,
                    error: KafkaErrorCode::None,
                }
            })
            .collect()
    }
}
