//! An in-memory snapshot of partition-to-core ownership.

use dashmap::DashMap;

use crate::router::domain_types::{CoreId, PartitionId};
use crate::router::traits::ShardTable;

/// A `DashMap`-backed shard table. Lookups are lock-free reads; ownership
/// can be updated concurrently from outside the router (e.g. as cluster
/// membership changes), which is exactly why `spec.md` §4.5 documents
/// `shard_for` results as snapshots rather than pinned decisions.
#[derive(Default)]
pub struct InMemoryShardTable {
    ownership: DashMap<PartitionId, CoreId>,
}

impl InMemoryShardTable {
    /// An empty shard table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `partition` to `core`, overwriting any previous assignment.
    pub fn assign(&self, partition: PartitionId, core: CoreId) {
        self.ownership.insert(partition, core);
    }

    /// Removes a partition's assignment, so future lookups return `None`.
    pub fn unassign(&self, partition: &PartitionId) {
        self.ownership.remove(partition);
    }
}

impl ShardTable for InMemoryShardTable {
    fn core_for(&self, partition: &PartitionId) -> Option<CoreId> {
        self.ownership.get(partition).map(|entry| *entry.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::domain_types::TopicNamespace;

    #[test]
    fn unassigned_partition_resolves_to_none() {
        let table = InMemoryShardTable::new();
        let partition = PartitionId::new(TopicNamespace::KafkaInternal, "t", 0);
        assert!(table.core_for(&partition).is_none());
    }

    #[test]
    fn assignment_is_observed_by_later_lookups() {
        let table = InMemoryShardTable::new();
        let partition = PartitionId::new(TopicNamespace::KafkaInternal, "t", 3);
        table.assign(partition, CoreId::from(2));
        assert_eq!(table.core_for(&partition), Some(CoreId::from(2)));
    }

    #[test]
    fn reassignment_overwrites_the_previous_owner() {
        let table = InMemoryShardTable::new();
        let partition = PartitionId::new(TopicNamespace::KafkaInternal, "t", 3);
        table.assign(partition, CoreId::from(2));
        table.assign(partition, CoreId::from(5));
        assert_eq!(table.core_for(&partition), Some(CoreId::from(5)));
    }
}
