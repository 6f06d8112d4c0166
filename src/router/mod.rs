//! Group coordinator router
//!
//! This module implements the router described in `spec.md`: the component
//! that accepts Kafka-protocol consumer-group and transactional-offset
//! requests at a broker's edge and dispatches each one to the single
//! execution core that owns the group's coordinator state.
//!
//! ## Architecture overview
//!
//! ```text
//! caller -> GroupRouter -> CoordinatorMapper -> ShardTable -> CrossCoreExecutor -> GroupManager (destination core)
//! ```
//!
//! The router is stateless: it holds only immutable references to its
//! collaborators, and every routing decision is recomputed from scratch on
//! each call (`spec.md` §3). Three families of operation are exposed:
//!
//! - **Single-group routing** (§4.1): `join_group`, `sync_group`,
//!   `heartbeat`, `leave_group`, `offset_fetch`, `describe_group`,
//!   `txn_offset_commit`, `begin_tx`, `prepare_tx`, `commit_tx`, `abort_tx`.
//! - **Two-stage offset commit** (§4.2): `offset_commit`.
//! - **Fan-out** (§4.3, §4.4): `list_groups`, `delete_groups`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use shard_router::router::domain_types::{CoreId, GroupId, TopicNamespace};
//! use shard_router::router::config::RouterConfig;
//! use shard_router::router::executor::LocalExecutor;
//! use shard_router::router::implementations::{
//!     HashingCoordinatorMapper, InMemoryGroupManager, InMemoryShardTable,
//! };
//! use shard_router::router::traits::{CoordinatorMapper, ShardTable};
//! use shard_router::router::GroupRouter;
//! use shard_router::router::requests::HeartbeatRequest;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = RouterConfig::development();
//! let mapper = HashingCoordinatorMapper::new(TopicNamespace::KafkaInternal, "__consumer_offsets", 8);
//! let shard_table = InMemoryShardTable::new();
//! let partition = mapper.partition_id_for(&GroupId::from_str_name("g")).unwrap();
//! shard_table.assign(partition, CoreId::from(0));
//!
//! let executor = Arc::new(LocalExecutor::new(1));
//! executor.configure_submission_group(
//!     config.submission_service_group(),
//!     config.max_in_flight_cross_core_calls,
//! );
//!
//! let group_managers = Arc::new(vec![
//!     Arc::new(InMemoryGroupManager::new()) as Arc<dyn shard_router::router::traits::GroupManager>,
//! ]);
//!
//! let router = GroupRouter::new(
//!     CoreId::from(0),
//!     Arc::new(mapper) as Arc<dyn CoordinatorMapper>,
//!     Arc::new(shard_table) as Arc<dyn ShardTable>,
//!     group_managers,
//!     executor,
//!     config.scheduling_group(),
//!     config.submission_service_group(),
//! );
//!
//! let response = router
//!     .heartbeat(HeartbeatRequest {
//!         group: GroupId::from_str_name("g"),
//!         partition: None,
//!         member_id: "m".to_string(),
//!         generation_id: 1,
//!     })
//!     .await
//!     .unwrap();
//! assert!(matches!(response.error, shard_router::error::KafkaErrorCode::None));
//! # }
//! ```

pub mod config;
pub mod domain_types;
pub mod executor;
pub mod group_router;
pub mod implementations;
pub mod requests;
pub mod traits;

pub use config::{ConfigError, RouterConfig, RouterConfigBuilder};
pub use executor::LocalExecutor;
pub use group_router::{CommittedSignal, DispatchedSignal, GroupRouter};
