//! Error vocabularies for the group coordinator router.
//!
//! Two disjoint error-kind taxonomies are kept apart on purpose (see
//! `spec.md` §6, §7): Kafka-protocol operations only ever see
//! [`KafkaErrorCode`], transactional-group operations only ever see
//! [`TxnErrorCode`]. A single helper per taxonomy constructs the synthesized
//! "not coordinator" response so the two vocabularies can never be mixed up
//! at a call site.

use thiserror::Error;

/// Public Kafka protocol error codes the router is allowed to originate.
///
/// The router only ever produces `NotCoordinator`; the other variants exist
/// so response types that wrap this code compile against the full space of
/// values a caller might see from upstream, without the router itself being
/// able to construct them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KafkaErrorCode {
    /// No error.
    None,
    /// This broker is not the coordinator for the requested group.
    NotCoordinator,
    /// Passed through unchanged from the group manager; the router never
    /// constructs this variant itself.
    Other(i16),
}

impl KafkaErrorCode {
    /// Whether this code represents success.
    #[must_use]
    pub fn is_none(self) -> bool {
        matches!(self, KafkaErrorCode::None)
    }
}

/// Cluster-internal transaction coordinator error codes.
///
/// Kept separate from [`KafkaErrorCode`] even though both have a
/// "not coordinator" member: mixing them would let a transactional response
/// accidentally carry a Kafka-protocol code or vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnErrorCode {
    /// No error.
    None,
    /// This core does not own the coordinator for the requested transactional
    /// group.
    NotCoordinator,
    /// Passed through unchanged from the group manager.
    Other(i16),
}

impl TxnErrorCode {
    /// Whether this code represents success.
    #[must_use]
    pub fn is_none(self) -> bool {
        matches!(self, TxnErrorCode::None)
    }
}

/// Errors the router surfaces to its caller.
///
/// The router performs no retries and no masking: a failure from the cross-
/// core executor or from the destination group manager propagates as-is
/// through this type.
#[derive(Debug, Error, Clone)]
pub enum RouterError {
    /// The configured cross-core executor rejected the dispatch (submission
    /// service group full, destination core shut down).
    #[error("cross-core dispatch failed: {0}")]
    DispatchFailed(String),

    /// The destination group manager returned a failure.
    #[error("group manager failure: {0}")]
    GroupManager(String),

    /// The fire-and-forget notification that resolves a two-stage commit's
    /// dispatched signal was dropped before it could be delivered.
    #[error("dispatched-signal notification lost: {0}")]
    NotificationLost(String),
}
