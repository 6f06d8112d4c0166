//! Request and response types for every routed operation.
//!
//! Every request exposes a `group()` accessor and a writable partition-id
//! slot (`set_partition`); every response type can be synthesized from a
//! request plus an error kind via `from_request_error`, which is the
//! "no coordinator" failure path of `spec.md` §4.1. The [`RoutableRequest`]
//! / [`RoutableResponse`] traits in [`super::traits`] capture this shape so
//! `GroupRouter::route_single` can be written once and reused for every
//! operation, the way the teacher crate's `MessageRouter` trait is shared
//! across delivery paths instead of duplicating per-message-type logic.

use crate::error::{KafkaErrorCode, TxnErrorCode};
use crate::router::domain_types::{GroupId, PartitionId};
use crate::router::traits::{RoutableRequest, RoutableResponse};

/// `JoinGroup` request.
#[derive(Debug, Clone)]
pub struct JoinGroupRequest {
    /// Group this request is addressed to.
    pub group: GroupId,
    /// Filled in by the router once the routing decision resolves.
    pub partition: Option<PartitionId>,
    /// Member id, empty string for a first join.
    pub member_id: String,
    /// Rebalance timeout in milliseconds.
    pub rebalance_timeout_ms: i32,
}

impl RoutableRequest for JoinGroupRequest {
    fn group(&self) -> &GroupId {
        &self.group
    }
    fn set_partition(&mut self, partition: PartitionId) {
        self.partition = Some(partition);
    }
}

/// `JoinGroup` response.
#[derive(Debug, Clone)]
pub struct JoinGroupResponse {
    /// Echoes the request's group.
    pub group: GroupId,
    /// Kafka-protocol error code.
    pub error: KafkaErrorCode,
    /// Generation id assigned by the coordinator; `-1` on failure.
    pub generation_id: i32,
    /// Member id assigned by the coordinator; empty on failure.
    pub member_id: String,
}

impl RoutableResponse for JoinGroupResponse {
    type Request = JoinGroupRequest;

    fn not_coordinator(request: &Self::Request) -> Self {
        Self {
            group: request.group.clone(),
            error: KafkaErrorCode::NotCoordinator,
            generation_id: -1,
            member_id: String::new(),
        }
    }
}

/// `SyncGroup` request.
#[derive(Debug, Clone)]
pub struct SyncGroupRequest {
    /// Group this request is addressed to.
    pub group: GroupId,
    /// Filled in by the router once the routing decision resolves.
    pub partition: Option<PartitionId>,
    /// Member id.
    pub member_id: String,
    /// Generation id the member believes is current.
    pub generation_id: i32,
}

impl RoutableRequest for SyncGroupRequest {
    fn group(&self) -> &GroupId {
        &self.group
    }
    fn set_partition(&mut self, partition: PartitionId) {
        self.partition = Some(partition);
    }
}

/// `SyncGroup` response.
#[derive(Debug, Clone)]
pub struct SyncGroupResponse {
    /// Echoes the request's group.
    pub group: GroupId,
    /// Kafka-protocol error code.
    pub error: KafkaErrorCode,
    /// Member assignment bytes, empty on failure.
    pub assignment: Vec<u8>,
}

impl RoutableResponse for SyncGroupResponse {
    type Request = SyncGroupRequest;

    fn not_coordinator(request: &Self::Request) -> Self {
        Self {
            group: request.group.clone(),
            error: KafkaErrorCode::NotCoordinator,
            assignment: Vec::new(),
        }
    }
}

/// `Heartbeat` request.
#[derive(Debug, Clone)]
pub struct HeartbeatRequest {
    /// Group this request is addressed to.
    pub group: GroupId,
    /// Filled in by the router once the routing decision resolves.
    pub partition: Option<PartitionId>,
    /// Member id.
    pub member_id: String,
    /// Generation id the member believes is current.
    pub generation_id: i32,
}

impl RoutableRequest for HeartbeatRequest {
    fn group(&self) -> &GroupId {
        &self.group
    }
    fn set_partition(&mut self, partition: PartitionId) {
        self.partition = Some(partition);
    }
}

/// `Heartbeat` response.
#[derive(Debug, Clone)]
pub struct HeartbeatResponse {
    /// Echoes the request's group.
    pub group: GroupId,
    /// Kafka-protocol error code.
    pub error: KafkaErrorCode,
}

impl RoutableResponse for HeartbeatResponse {
    type Request = HeartbeatRequest;

    fn not_coordinator(request: &Self::Request) -> Self {
        Self {
            group: request.group.clone(),
            error: KafkaErrorCode::NotCoordinator,
        }
    }
}

/// `LeaveGroup` request.
#[derive(Debug, Clone)]
pub struct LeaveGroupRequest {
    /// Group this request is addressed to.
    pub group: GroupId,
    /// Filled in by the router once the routing decision resolves.
    pub partition: Option<PartitionId>,
    /// Member ids leaving the group.
    pub member_ids: Vec<String>,
}

impl RoutableRequest for LeaveGroupRequest {
    fn group(&self) -> &GroupId {
        &self.group
    }
    fn set_partition(&mut self, partition: PartitionId) {
        self.partition = Some(partition);
    }
}

/// `LeaveGroup` response.
#[derive(Debug, Clone)]
pub struct LeaveGroupResponse {
    /// Echoes the request's group.
    pub group: GroupId,
    /// Kafka-protocol error code.
    pub error: KafkaErrorCode,
}

impl RoutableResponse for LeaveGroupResponse {
    type Request = LeaveGroupRequest;

    fn not_coordinator(request: &Self::Request) -> Self {
        Self {
            group: request.group.clone(),
            error: KafkaErrorCode::NotCoordinator,
        }
    }
}

/// `OffsetFetch` request.
#[derive(Debug, Clone)]
pub struct OffsetFetchRequest {
    /// Group this request is addressed to.
    pub group: GroupId,
    /// Filled in by the router once the routing decision resolves.
    pub partition: Option<PartitionId>,
    /// Topic-partitions to fetch committed offsets for; empty means all.
    pub topics: Vec<String>,
}

impl RoutableRequest for OffsetFetchRequest {
    fn group(&self) -> &GroupId {
        &self.group
    }
    fn set_partition(&mut self, partition: PartitionId) {
        self.partition = Some(partition);
    }
}

/// `OffsetFetch` response.
#[derive(Debug, Clone)]
pub struct OffsetFetchResponse {
    /// Echoes the request's group.
    pub group: GroupId,
    /// Kafka-protocol error code.
    pub error: KafkaErrorCode,
    /// Committed offsets, empty on failure.
    pub offsets: Vec<(String, i64)>,
}

impl RoutableResponse for OffsetFetchResponse {
    type Request = OffsetFetchRequest;

    fn not_coordinator(request: &Self::Request) -> Self {
        Self {
            group: request.group.clone(),
            error: KafkaErrorCode::NotCoordinator,
            offsets: Vec::new(),
        }
    }
}

/// `DescribeGroup` request.
#[derive(Debug, Clone)]
pub struct DescribeGroupRequest {
    /// Group this request is addressed to.
    pub group: GroupId,
    /// Filled in by the router once the routing decision resolves.
    pub partition: Option<PartitionId>,
}

impl RoutableRequest for DescribeGroupRequest {
    fn group(&self) -> &GroupId {
        &self.group
    }
    fn set_partition(&mut self, partition: PartitionId) {
        self.partition = Some(partition);
    }
}

/// `DescribeGroup` response.
#[derive(Debug, Clone)]
pub struct DescribeGroupResponse {
    /// Echoes the request's group.
    pub group: GroupId,
    /// Kafka-protocol error code.
    pub error: KafkaErrorCode,
    /// Group state description, e.g. `"Stable"`; empty on failure.
    pub state: String,
    /// Member ids in the group.
    pub members: Vec<String>,
}

impl RoutableResponse for DescribeGroupResponse {
    type Request = DescribeGroupRequest;

    fn not_coordinator(request: &Self::Request) -> Self {
        Self {
            group: request.group.clone(),
            error: KafkaErrorCode::NotCoordinator,
            state: String::new(),
            members: Vec::new(),
        }
    }
}

/// `OffsetCommit` request — the single-call shape used internally by the
/// two-stage protocol of `spec.md` §4.2; the public `offset_commit` entry
/// point on [`crate::router::GroupRouter`] takes this same type.
#[derive(Debug, Clone)]
pub struct OffsetCommitRequest {
    /// Group this request is addressed to.
    pub group: GroupId,
    /// Filled in by the router once the routing decision resolves.
    pub partition: Option<PartitionId>,
    /// Topic-partition -> offset being committed.
    pub offsets: Vec<(String, i64)>,
}

impl RoutableRequest for OffsetCommitRequest {
    fn group(&self) -> &GroupId {
        &self.group
    }
    fn set_partition(&mut self, partition: PartitionId) {
        self.partition = Some(partition);
    }
}

/// `OffsetCommit` response — carried by the *committed* signal.
#[derive(Debug, Clone)]
pub struct OffsetCommitResponse {
    /// Echoes the request's group.
    pub group: GroupId,
    /// Kafka-protocol error code.
    pub error: KafkaErrorCode,
}

impl RoutableResponse for OffsetCommitResponse {
    type Request = OffsetCommitRequest;

    fn not_coordinator(request: &Self::Request) -> Self {
        Self {
            group: request.group.clone(),
            error: KafkaErrorCode::NotCoordinator,
        }
    }
}

/// `TxnOffsetCommit` request (transactional flavor of offset commit).
#[derive(Debug, Clone)]
pub struct TxnOffsetCommitRequest {
    /// Group this request is addressed to.
    pub group: GroupId,
    /// Filled in by the router once the routing decision resolves.
    pub partition: Option<PartitionId>,
    /// Producer id of the transaction.
    pub producer_id: i64,
    /// Producer epoch of the transaction.
    pub producer_epoch: i16,
    /// Topic-partition -> offset being committed.
    pub offsets: Vec<(String, i64)>,
}

impl RoutableRequest for TxnOffsetCommitRequest {
    fn group(&self) -> &GroupId {
        &self.group
    }
    fn set_partition(&mut self, partition: PartitionId) {
        self.partition = Some(partition);
    }
}

/// `TxnOffsetCommit` response.
#[derive(Debug, Clone)]
pub struct TxnOffsetCommitResponse {
    /// Echoes the request's group.
    pub group: GroupId,
    /// Cluster-internal transaction error code.
    pub error: TxnErrorCode,
}

impl RoutableResponse for TxnOffsetCommitResponse {
    type Request = TxnOffsetCommitRequest;

    fn not_coordinator(request: &Self::Request) -> Self {
        Self {
            group: request.group.clone(),
            error: TxnErrorCode::NotCoordinator,
        }
    }
}

macro_rules! txn_request_response {
    ($req:ident, $resp:ident) => {
        #[doc = concat!("`", stringify!($req), "` request.")]
        #[derive(Debug, Clone)]
        pub struct $req {
            /// Group (the transactional id) this request is addressed to.
            pub group: GroupId,
            /// Filled in by the router once the routing decision resolves.
            pub partition: Option<PartitionId>,
            /// Producer id of the transaction.
            pub producer_id: i64,
            /// Producer epoch of the transaction.
            pub producer_epoch: i16,
        }

        impl RoutableRequest for $req {
            fn group(&self) -> &GroupId {
                &self.group
            }
            fn set_partition(&mut self, partition: PartitionId) {
                self.partition = Some(partition);
            }
        }

        #[doc = concat!("`", stringify!($resp), "` response.")]
        #[derive(Debug, Clone)]
        pub struct $resp {
            /// Echoes the request's group.
            pub group: GroupId,
            /// Cluster-internal transaction error code.
            pub error: TxnErrorCode,
        }

        impl RoutableResponse for $resp {
            type Request = $req;

            fn not_coordinator(request: &Self::Request) -> Self {
                Self {
                    group: request.group.clone(),
                    error: TxnErrorCode::NotCoordinator,
                }
            }
        }
    };
}

txn_request_response!(BeginTxRequest, BeginTxResponse);
txn_request_response!(PrepareTxRequest, PrepareTxResponse);
txn_request_response!(CommitTxRequest, CommitTxResponse);
txn_request_response!(AbortTxRequest, AbortTxResponse);

/// One entry of a `list_groups` result, as reported by a single core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedGroup {
    /// Group id.
    pub group: GroupId,
    /// Protocol type, e.g. `"consumer"`.
    pub protocol_type: String,
}

/// Outcome of deleting a single group, keyed by group id so the fan-out
/// result (`spec.md` §4.4) can be treated as a bag rather than an ordered
/// list.
#[derive(Debug, Clone)]
pub struct DeletableGroupResult {
    /// Group id this result is for.
    pub group: GroupId,
    /// Kafka-protocol error code for this group's deletion.
    pub error: KafkaErrorCode,
}
