//! # `shard_router` — group coordinator router
//!
//! `shard_router` implements the routing layer that sits between a Kafka
//! broker's protocol handlers and its per-core consumer-group and
//! transaction-coordinator state. It maps an opaque group identifier to the
//! execution core that owns its coordinator, crosses that core boundary on
//! a thread-per-core runtime, and fans requests out across every core for
//! cluster-wide queries.
//!
//! Deliberately out of scope: the group state machine itself (join/sync/
//! heartbeat, rebalance generation, member expiry), durable offset storage,
//! the wire codec, socket handling, cluster metadata propagation, and
//! authentication/ACL enforcement. Those are reached only through the
//! narrow collaborator traits in [`router::traits`].
//!
//! See [`router`] for the router implementation and [`error`] for the two
//! disjoint error-code vocabularies it is allowed to originate.

pub mod error;
pub mod router;

pub use error::{KafkaErrorCode, RouterError, TxnErrorCode};
pub use router::GroupRouter;

// Common imports, re-exported the way the teacher crate re-exports its
// ambient stack from `lib.rs`.
pub use ::tracing::{debug, error, info, instrument, warn};
pub use thiserror::Error;
