//! `shard-router-demo` — wires an in-memory mapper, shard table, and group
//! manager together across a handful of simulated cores and exercises the
//! group coordinator router end to end.

use std::sync::Arc;

use shard_router::router::config::RouterConfig;
use shard_router::router::domain_types::{CoreId, GroupId, TopicNamespace};
use shard_router::router::executor::LocalExecutor;
use shard_router::router::implementations::{
    HashingCoordinatorMapper, InMemoryGroupManager, InMemoryShardTable,
};
use shard_router::router::requests::HeartbeatRequest;
use shard_router::router::traits::{CoordinatorMapper, GroupManager, ShardTable};
use shard_router::router::GroupRouter;
use tracing::info;

const CORE_COUNT: usize = 4;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shard_router=info".parse()?),
        )
        .init();

    info!(cores = CORE_COUNT, "starting shard-router demo");

    let config = RouterConfig::production();
    config.validate()?;

    let mapper = HashingCoordinatorMapper::new(
        TopicNamespace::KafkaInternal,
        "__consumer_offsets",
        i32::try_from(CORE_COUNT * 4)?,
    );
    let shard_table = InMemoryShardTable::new();

    let executor = Arc::new(LocalExecutor::new(CORE_COUNT));
    executor
        .configure_submission_group(config.submission_service_group(), config.max_in_flight_cross_core_calls);

    let group_managers: Arc<Vec<Arc<dyn GroupManager>>> = Arc::new(
        (0..CORE_COUNT)
            .map(|_| Arc::new(InMemoryGroupManager::new()) as Arc<dyn GroupManager>)
            .collect(),
    );

    let demo_group = GroupId::from_str_name("demo-consumer-group");
    if let Some(partition) = CoordinatorMapper::partition_id_for(&mapper, &demo_group) {
        let owner = CoreId::from(partition.partition.into_inner().unsigned_abs() as usize % CORE_COUNT);
        shard_table.assign(partition, owner);
        info!(%demo_group, core = usize::from(owner), "assigned demo group to core");
    }

    let router = GroupRouter::new(
        CoreId::from(0),
        Arc::new(mapper) as Arc<dyn CoordinatorMapper>,
        Arc::new(shard_table) as Arc<dyn ShardTable>,
        group_managers,
        executor,
        config.scheduling_group(),
        config.submission_service_group(),
    );

    let response = router
        .heartbeat(HeartbeatRequest {
            group: demo_group.clone(),
            partition: None,
            member_id: "demo-member".to_string(),
            generation_id: 1,
        })
        .await?;
    info!(?response.error, "heartbeat routed");

    let (error, groups) = router.list_groups().await;
    info!(?error, count = groups.len(), "list_groups fan-out complete");

    Ok(())
}
