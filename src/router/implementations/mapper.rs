//! A deterministic, hash-based coordinator mapper.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::router::domain_types::{GroupId, PartitionId, TopicNamespace};
use crate::router::traits::CoordinatorMapper;

/// Hashes group identifiers onto a fixed-size offsets topic, the same way a
/// broker hashes consumer groups onto `__consumer_offsets` partitions.
///
/// A group can be marked "unresolvable" to model the case where the
/// internal topic has not been created yet (`spec.md` §4.1, failure path);
/// every other group hashes deterministically (`spec.md` §3, invariant 1).
pub struct HashingCoordinatorMapper {
    namespace: TopicNamespace,
    topic: &'static str,
    partition_count: i32,
    unresolvable: HashSet<GroupId>,
}

impl HashingCoordinatorMapper {
    /// Creates a mapper over `partition_count` partitions of `topic`.
    #[must_use]
    pub fn new(namespace: TopicNamespace, topic: &'static str, partition_count: i32) -> Self {
        Self {
            namespace,
            topic,
            partition_count,
            unresolvable: HashSet::new(),
        }
    }

    /// An empty mapper that resolves nothing, for exercising the router's
    /// "no coordinator mapping" failure path (`spec.md` §8, property 1).
    #[must_use]
    pub fn empty() -> Self {
        Self::new(TopicNamespace::KafkaInternal, "__consumer_offsets", 0)
    }

    /// Marks `group` so future lookups return `None`, regardless of hashing.
    pub fn mark_unresolvable(&mut self, group: GroupId) {
        self.unresolvable.insert(group);
    }
}

impl CoordinatorMapper for HashingCoordinatorMapper {
    fn partition_id_for(&self, group: &GroupId) -> Option<PartitionId> {
        if self.partition_count <= 0 || self.unresolvable.contains(group) {
            return None;
        }
        let mut hasher = DefaultHasher::new();
        group.as_bytes().hash(&mut hasher);
        let partition = (hasher.finish() % u64::try_from(self.partition_count).unwrap()) as i32;
        Some(PartitionId::new(self.namespace, self.topic, partition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_group_hashes_to_the_same_partition() {
        let mapper = HashingCoordinatorMapper::new(TopicNamespace::KafkaInternal, "t", 16);
        let group = GroupId::from_str_name("consumer-group-a");
        assert_eq!(
            mapper.partition_id_for(&group),
            mapper.partition_id_for(&group)
        );
    }

    #[test]
    fn empty_mapper_resolves_nothing() {
        let mapper = HashingCoordinatorMapper::empty();
        assert!(mapper
            .partition_id_for(&GroupId::from_str_name("anything"))
            .is_none());
    }

    #[test]
    fn marked_group_becomes_unresolvable() {
        let mut mapper = HashingCoordinatorMapper::new(TopicNamespace::KafkaInternal, "t", 16);
        let group = GroupId::from_str_name("flaky-group");
        assert!(mapper.partition_id_for(&group).is_some());
        mapper.mark_unresolvable(group.clone());
        assert!(mapper.partition_id_for(&group).is_none());
    }
}
