mod queue;

use crate::system::ISys;
use chrono::{DateTime, Utc};
use futures::{future::BoxFuture, FutureExt};
use queue::JobQueue;
use std::{
    fmt::Display,
    future::Future,
    panic::AssertUnwindSafe,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use tokio::{sync::Notify, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use uuid::Uuid;

/// The work a job performs when it fires
pub type JobTask = BoxFuture<'static, anyhow::Result<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller chosen identity of a job. At most one job per key name is pending,
/// and a key that recently fired for a given time is not accepted again for
/// that time.
///
/// The optional revision describes the job's payload. Resubmitting a pending
/// key at the same time is only a duplicate while the revision is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobKey {
    name: String,
    revision: Option<String>,
}

impl JobKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            revision: None,
        }
    }

    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Scheduled(JobId),
    /// A pending job with the same key but another fire time or revision was
    /// cancelled in favour of this one
    Rescheduled(JobId),
    /// A job with the same key is already pending with the same time and
    /// revision, or recently fired for that time. Nothing was queued.
    Duplicate,
}

/// In-process executor of one-shot jobs.
///
/// Cloning gives another handle to the same queue. Any task can `submit`
/// while a single `run` loop dispatches due jobs in fire time order.
/// Jobs only live in memory and are gone when the process stops.
#[derive(Clone)]
pub struct JobScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    queue: Mutex<JobQueue>,
    wakeup: Notify,
    sys: Arc<dyn ISys>,
    poll_interval: Duration,
    fired_key_retention: chrono::Duration,
}

impl JobScheduler {
    pub fn new(
        sys: Arc<dyn ISys>,
        poll_interval: Duration,
        fired_key_retention: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                queue: Mutex::new(JobQueue::default()),
                wakeup: Notify::new(),
                sys,
                poll_interval,
                fired_key_retention: chrono::Duration::from_std(fired_key_retention)
                    .unwrap_or_else(|_| chrono::Duration::hours(2)),
            }),
        }
    }

    fn queue(&self) -> MutexGuard<'_, JobQueue> {
        // Jobs never run while the lock is held, so a poisoned queue is still consistent
        self.inner.queue.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queues `task` to run at or after `fire_at`. A `fire_at` in the past
    /// runs on the next poll.
    pub fn submit<F>(&self, fire_at: DateTime<Utc>, key: Option<JobKey>, task: F) -> Submission
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let submission = self.queue().push(fire_at, key, task.boxed());
        if submission != Submission::Duplicate {
            self.inner.wakeup.notify_one();
        }
        submission
    }

    pub fn cancel(&self, id: &JobId) -> bool {
        let cancelled = self.queue().cancel(id);
        if cancelled {
            debug!("Cancelled job {}", id);
        }
        cancelled
    }

    /// Cancels the pending job holding `key` unless it fires exactly at
    /// `fire_at`. The revision of `key` is ignored.
    pub fn cancel_key_unless_at(&self, key: &JobKey, fire_at: DateTime<Utc>) -> Option<JobId> {
        let cancelled = self.queue().cancel_key(key.name(), Some(fire_at));
        if let Some(id) = &cancelled {
            debug!("Cancelled job {} with key {}", id, key.name());
        }
        cancelled
    }

    pub fn pending_count(&self) -> usize {
        self.queue().len()
    }

    /// Starts every job due at `now` and returns handles to the spawned runs.
    ///
    /// Job errors and panics are logged inside the spawned task and never
    /// reach the caller.
    pub fn dispatch_due(&self, now: DateTime<Utc>) -> Vec<JoinHandle<()>> {
        let due = {
            let mut queue = self.queue();
            queue.forget_fired_before(now - self.inner.fired_key_retention);
            queue.pop_due(now)
        };

        due.into_iter()
            .map(|job| {
                let id = job.id;
                let fire_at = job.fire_at;
                tokio::spawn(async move {
                    match AssertUnwindSafe(job.task).catch_unwind().await {
                        Ok(Ok(())) => debug!("Job {} due at {} completed", id, fire_at),
                        Ok(Err(e)) => error!("Job {} due at {} failed: {:?}", id, fire_at, e),
                        Err(_) => error!("Job {} due at {} panicked", id, fire_at),
                    }
                })
            })
            .collect()
    }

    fn time_until_next_poll(&self, now: DateTime<Utc>) -> Duration {
        let poll_interval = self.inner.poll_interval;
        match self.queue().next_fire_at() {
            Some(fire_at) => (fire_at - now)
                .to_std()
                .map(|until_due| until_due.min(poll_interval))
                .unwrap_or(Duration::ZERO),
            None => poll_interval,
        }
    }

    /// Dispatches jobs as they become due until `shutdown` is cancelled
    pub async fn run(&self, shutdown: CancellationToken) {
        info!("Job scheduler started");
        loop {
            let now = self.inner.sys.now();
            let dispatched = self.dispatch_due(now);
            if !dispatched.is_empty() {
                debug!("Dispatched {} jobs", dispatched.len());
            }

            let sleep_for = self.time_until_next_poll(now);
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = self.inner.wakeup.notified() => {}
                _ = tokio::time::sleep(sleep_for) => {}
            }
        }
        info!(
            "Job scheduler stopped with {} pending jobs",
            self.pending_count()
        );
    }
}
