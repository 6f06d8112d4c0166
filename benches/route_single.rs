//! Benchmarks for the single-group routing path: how much overhead the
//! router itself adds on top of a group manager call that resolves
//! immediately.
#![allow(clippy::pedantic)]

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shard_router::router::config::RouterConfig;
use shard_router::router::domain_types::{CoreId, GroupId, TopicNamespace};
use shard_router::router::executor::LocalExecutor;
use shard_router::router::implementations::{
    HashingCoordinatorMapper, InMemoryGroupManager, InMemoryShardTable,
};
use shard_router::router::requests::HeartbeatRequest;
use shard_router::router::traits::{CoordinatorMapper, GroupManager, ShardTable};
use shard_router::router::GroupRouter;
use tokio::runtime::Runtime;

/// Builds a router with a single group already pinned to core 0, so every
/// benchmarked call takes the cross-core dispatch path rather than the
/// "not coordinator" fast path.
fn build_router(core_count: usize, pinned_group: &GroupId) -> GroupRouter<LocalExecutor> {
    let mapper =
        HashingCoordinatorMapper::new(TopicNamespace::KafkaInternal, "__consumer_offsets", 64);
    let shard_table = InMemoryShardTable::new();
    if let Some(partition) = mapper.partition_id_for(pinned_group) {
        shard_table.assign(partition, CoreId::from(0));
    }

    let config = RouterConfig::production();
    let executor = Arc::new(LocalExecutor::new(core_count));
    executor.configure_submission_group(
        config.submission_service_group(),
        config.max_in_flight_cross_core_calls,
    );

    let group_managers: Arc<Vec<Arc<dyn GroupManager>>> = Arc::new(
        (0..core_count)
            .map(|_| Arc::new(InMemoryGroupManager::new()) as Arc<dyn GroupManager>)
            .collect(),
    );

    let router = GroupRouter::new(
        CoreId::from(0),
        Arc::new(mapper) as Arc<dyn CoordinatorMapper>,
        Arc::new(shard_table) as Arc<dyn ShardTable>,
        group_managers,
        executor,
        config.scheduling_group(),
        config.submission_service_group(),
    );

    router
}

/// Benchmark routing a single, already-mapped heartbeat across a varying
/// number of simulated cores.
fn bench_route_single_heartbeat(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("route_single_heartbeat");
    group.measurement_time(Duration::from_secs(10));
    group.throughput(Throughput::Elements(1));

    for core_count in [1usize, 4, 16, 64] {
        group.bench_with_input(
            BenchmarkId::new("cores", core_count),
            &core_count,
            |b, &core_count| {
                let group_id = GroupId::from_str_name("bench-group");
                let router = build_router(core_count, &group_id);

                b.to_async(&rt).iter(|| async {
                    let response = router
                        .heartbeat(HeartbeatRequest {
                            group: group_id.clone(),
                            partition: None,
                            member_id: "bench-member".to_string(),
                            generation_id: 1,
                        })
                        .await;
                    black_box(response)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_route_single_heartbeat);
criterion_main!(benches);
