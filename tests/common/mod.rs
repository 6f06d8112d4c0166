//! Shared test harness: wires an in-memory mapper, shard table, and one
//! `InMemoryGroupManager` per simulated core behind a `GroupRouter`.
#![allow(clippy::pedantic, dead_code)]

use std::sync::Arc;

use shard_router::router::config::RouterConfig;
use shard_router::router::domain_types::{CoreId, GroupId, PartitionId, TopicNamespace};
use shard_router::router::executor::LocalExecutor;
use shard_router::router::implementations::{
    HashingCoordinatorMapper, InMemoryGroupManager, InMemoryShardTable,
};
use shard_router::router::traits::{CoordinatorMapper, GroupManager, ShardTable};
use shard_router::router::GroupRouter;

/// A fully wired router plus handles to its collaborators, so tests can
/// reach into them (assign partitions, seed groups, script commit outcomes)
/// without going through the router itself.
pub struct Harness {
    pub router: GroupRouter<LocalExecutor>,
    pub mapper: Arc<HashingCoordinatorMapper>,
    pub shard_table: Arc<InMemoryShardTable>,
    pub managers: Vec<Arc<InMemoryGroupManager>>,
}

impl Harness {
    /// Builds a harness with `core_count` cores and a mapper that resolves
    /// every group identifier (deterministically, via hashing).
    pub fn new(core_count: usize) -> Self {
        Self::with_mapper(
            core_count,
            HashingCoordinatorMapper::new(TopicNamespace::KafkaInternal, "__consumer_offsets", 64),
        )
    }

    /// Builds a harness with no mapper resolution at all, for exercising the
    /// "no coordinator mapping" failure path (`spec.md` §8, property 1, S1).
    pub fn with_unresolvable_mapper(core_count: usize) -> Self {
        Self::with_mapper(core_count, HashingCoordinatorMapper::empty())
    }

    fn with_mapper(core_count: usize, mapper: HashingCoordinatorMapper) -> Self {
        let mapper = Arc::new(mapper);
        let shard_table = Arc::new(InMemoryShardTable::new());
        let managers: Vec<Arc<InMemoryGroupManager>> = (0..core_count)
            .map(|_| Arc::new(InMemoryGroupManager::new()))
            .collect();
        let group_managers: Arc<Vec<Arc<dyn GroupManager>>> = Arc::new(
            managers
                .iter()
                .map(|m| Arc::clone(m) as Arc<dyn GroupManager>)
                .collect(),
        );

        let config = RouterConfig::testing();
        let executor = Arc::new(LocalExecutor::new(core_count));
        executor.configure_submission_group(
            config.submission_service_group(),
            config.max_in_flight_cross_core_calls.max(core_count),
        );

        let router = GroupRouter::new(
            CoreId::from(0),
            Arc::clone(&mapper) as Arc<dyn CoordinatorMapper>,
            Arc::clone(&shard_table) as Arc<dyn ShardTable>,
            group_managers,
            executor,
            config.scheduling_group(),
            config.submission_service_group(),
        );

        Self {
            router,
            mapper,
            shard_table,
            managers,
        }
    }

    /// Resolves `group`'s partition id via this harness's mapper (panics if
    /// unresolvable; only meant for harnesses built with `new`).
    pub fn partition_for(&self, group: &GroupId) -> PartitionId {
        self.mapper
            .partition_id_for(group)
            .expect("harness mapper resolves every group")
    }

    /// Pins `group` onto `core`, assigning its mapped partition there.
    pub fn assign_group_to_core(&self, group: &GroupId, core: CoreId) -> PartitionId {
        let partition = self.partition_for(group);
        self.shard_table.assign(partition, core);
        partition
    }
}
