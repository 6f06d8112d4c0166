//! In-process stand-in for the thread-per-core cross-core executor.
//!
//! `spec.md` §5 describes a process with one execution thread per CPU core,
//! where crossing cores is an explicit asynchronous message. This crate does
//! not own a real thread-per-core runtime (that lives in the surrounding
//! broker); [`LocalExecutor`] models the same contract — "every cross-core
//! dispatch is a suspension point", bounded concurrency via a submission
//! service group — on top of the tokio multi-thread runtime, using one
//! `Semaphore` per submission service group the way the teacher crate's
//! `MessageRouterImpl` bounds concurrency with a single
//! `routing_semaphore: Arc<Semaphore>` field.
//!
//! This substitution is recorded as an open-question resolution in
//! `DESIGN.md`: production code would replace [`LocalExecutor`] with a
//! binding to the broker's actual reactor, without the router crate itself
//! changing.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use futures::future::BoxFuture;
use tokio::sync::Semaphore;
use tracing::trace;

use crate::error::RouterError;
use crate::router::domain_types::CoreId;
use crate::router::traits::{
    CrossCoreExecutor, SchedulingGroup, SchedulingGroupController, SubmissionServiceGroup,
};

/// Tokio-backed [`CrossCoreExecutor`] with one bounded-concurrency
/// [`Semaphore`] per submission service group.
pub struct LocalExecutor {
    core_count: usize,
    submission_groups: DashMap<usize, Arc<Semaphore>>,
}

impl LocalExecutor {
    /// Creates an executor that reports `core_count` cores.
    #[must_use]
    pub fn new(core_count: usize) -> Self {
        Self {
            core_count,
            submission_groups: DashMap::new(),
        }
    }

    /// Registers (or reuses) a submission service group with the given
    /// concurrency bound.
    pub fn configure_submission_group(&self, group: SubmissionServiceGroup, max_in_flight: usize) {
        self.submission_groups
            .entry(group.id)
            .or_insert_with(|| Arc::new(Semaphore::new(max_in_flight)));
    }

    fn semaphore_for(&self, group: SubmissionServiceGroup) -> Arc<Semaphore> {
        self.submission_groups
            .entry(group.id)
            .or_insert_with(|| Arc::new(Semaphore::new(usize::from(u16::MAX))))
            .clone()
    }
}

#[async_trait]
impl CrossCoreExecutor for LocalExecutor {
    async fn invoke_on<F, T>(
        &self,
        core: CoreId,
        submission_group: SubmissionServiceGroup,
        task: F,
    ) -> Result<T, RouterError>
    where
        F: FnOnce() -> BoxFuture<'static, T> + Send + 'static,
        T: Send + 'static,
    {
        let semaphore = self.semaphore_for(submission_group);
        let permit = semaphore.acquire_owned().await.map_err(|e| {
            RouterError::DispatchFailed(format!("submission service group closed: {e}"))
        })?;

        trace!(core = usize::from(core), "invoking on destination core");
        let result = tokio::spawn(async move {
            let _permit = permit;
            task().await
        })
        .await
        .map_err(|e| RouterError::DispatchFailed(format!("destination core task failed: {e}")))?;

        Ok(result)
    }

    fn submit_to<F>(&self, core: CoreId, task: F)
    where
        F: FnOnce() -> BoxFuture<'static, ()> + Send + 'static,
    {
        trace!(
            core = usize::from(core),
            "submitting fire-and-forget notification"
        );
        tokio::spawn(async move {
            task().await;
        });
    }

    fn core_count(&self) -> usize {
        self.core_count
    }
}

#[async_trait]
impl SchedulingGroupController for LocalExecutor {
    async fn with_scheduling_group<F, T>(&self, group: SchedulingGroup, task: F) -> T
    where
        F: FnOnce() -> BoxFuture<'static, T> + Send + 'static,
        T: Send + 'static,
    {
        trace!(scheduling_group = group.id, "entering scheduling group");
        // A real scheduling group may defer here for CPU accounting; tokio's
        // cooperative scheduler gives us an equivalent yield point.
        tokio::task::yield_now().await;
        task().await
    }
}
