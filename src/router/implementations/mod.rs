//! Reference implementations of the router's external collaborators.
//!
//! `spec.md` §1 explicitly puts the group state machine, offset storage,
//! and cluster metadata outside this crate's scope. These in-memory
//! implementations exist only so the router can be exercised end-to-end by
//! the demo binary and the test suite, the way the teacher crate's
//! `message_router/implementations/` module provides a default
//! `AgentRegistry`/`ConversationManager` for its own tests.

mod group_manager;
mod mapper;
mod shard_table;

pub use group_manager::{InMemoryGroupManager, ScriptedCommitOutcome, COORDINATOR_LOAD_IN_PROGRESS};
pub use mapper::HashingCoordinatorMapper;
pub use shard_table::InMemoryShardTable;
