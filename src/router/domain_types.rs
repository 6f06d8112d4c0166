//! Domain types for the group coordinator router
//!
//! Strongly-typed values for group identifiers, internal-topic partition
//! ids, and execution core ids, to prevent primitive obsession when passing
//! these across the cross-core boundary.

use bytes::Bytes;
use nutype::nutype;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a consumer or transactional group.
///
/// Equality and hashing determine coordinator assignment; the router never
/// inspects the bytes beyond that. Cloning is cheap (`Bytes` is refcounted),
/// which matters because a `GroupId` is read by the mapper, copied onto a
/// response, and potentially compared again on the destination core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(Bytes);

impl GroupId {
    /// Builds a group identifier from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Builds a group identifier from a UTF-8 string, as Kafka clients send it.
    #[must_use]
    pub fn from_str_name(name: impl Into<String>) -> Self {
        Self(Bytes::from(name.into().into_bytes()))
    }

    /// Borrows the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) => write!(f, "{s}"),
            Err(_) => write!(f, "{:?}", self.0),
        }
    }
}

/// Namespace of the internal offsets topic a partition id lives in.
///
/// Kafka-protocol groups hash into the cluster's `__consumer_offsets` topic;
/// transaction coordinators hash into a separate internal namespace. Keeping
/// the namespace explicit in the type prevents the two from being confused
/// when they happen to collide on `(topic, partition)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TopicNamespace {
    /// `kafka-internal` namespace — `__consumer_offsets`.
    KafkaInternal,
    /// `redpanda-internal` namespace — the transaction coordinator's topic.
    RedpandaInternal,
}

/// Name of the internal offsets topic, e.g. `__consumer_offsets`.
#[nutype(derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRef
))]
pub struct TopicName(String);

/// Partition index within the offsets topic.
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Into,
    From
))]
pub struct PartitionIndex(i32);

/// `(namespace, topic, partition-index)` — the addressable unit of the
/// internal offsets topic that a group hashes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartitionId {
    /// Which internal topic family this partition belongs to.
    pub namespace: TopicNamespace,
    /// Name of the internal topic.
    pub topic: TopicName,
    /// Partition index within that topic.
    pub partition: PartitionIndex,
}

impl PartitionId {
    /// Convenience constructor.
    #[must_use]
    pub fn new(namespace: TopicNamespace, topic: &str, partition: i32) -> Self {
        Self {
            namespace,
            topic: TopicName::new(topic.to_string()),
            partition: PartitionIndex::from(partition),
        }
    }
}

/// Dense, non-negative identifier of an execution core, stable for the
/// lifetime of the process.
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Into,
    From
))]
pub struct CoreId(usize);

/// The outcome of resolving a group identifier to its owning core: both the
/// partition id it hashed to and the core currently holding that partition's
/// replica.
///
/// This is a snapshot, not a pinned decision — a later call for the same
/// group may return a different `CoreId` if ownership moved in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingDecision {
    /// Partition id the group identifier hashed to.
    pub partition: PartitionId,
    /// Core currently owning that partition's replica.
    pub core: CoreId,
}
