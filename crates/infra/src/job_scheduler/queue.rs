use super::{JobId, JobKey, JobTask, Submission};
use chrono::{DateTime, Utc};
use std::{
    cmp::{Ordering, Reverse},
    collections::{BinaryHeap, HashMap, HashSet},
};

pub(super) struct QueuedJob {
    pub fire_at: DateTime<Utc>,
    /// Submission order, breaks ties between jobs due at the same instant
    pub seq: u64,
    pub id: JobId,
    pub key: Option<JobKey>,
    pub task: JobTask,
}

impl PartialEq for QueuedJob {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.seq == other.seq
    }
}

impl Eq for QueuedJob {}

impl PartialOrd for QueuedJob {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedJob {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fire_at
            .cmp(&other.fire_at)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Pending jobs ordered by fire time, together with the bookkeeping needed
/// for cancellation and for rejecting resubmissions of the same key.
///
/// Cancelled jobs stay in the heap and are dropped when they reach the top.
#[derive(Default)]
pub(super) struct JobQueue {
    heap: BinaryHeap<Reverse<QueuedJob>>,
    next_seq: u64,
    /// Live (submitted, not fired, not cancelled) jobs
    pending: HashMap<JobId, Option<JobKey>>,
    cancelled: HashSet<JobId>,
    pending_keys: HashMap<String, PendingKey>,
    /// Key names together with the fire time they fired for
    fired_keys: HashSet<(String, DateTime<Utc>)>,
}

struct PendingKey {
    id: JobId,
    fire_at: DateTime<Utc>,
    revision: Option<String>,
}

impl JobQueue {
    pub fn push(
        &mut self,
        fire_at: DateTime<Utc>,
        key: Option<JobKey>,
        task: JobTask,
    ) -> Submission {
        let mut replaced = false;
        if let Some(key) = &key {
            if self.fired_keys.contains(&(key.name().to_string(), fire_at)) {
                return Submission::Duplicate;
            }
            if let Some(pending) = self.pending_keys.get(key.name()) {
                if pending.fire_at == fire_at && pending.revision.as_deref() == key.revision() {
                    return Submission::Duplicate;
                }
                let pending_id = pending.id;
                self.cancel(&pending_id);
                replaced = true;
            }
        }

        let id = JobId::new();
        let seq = self.next_seq;
        self.next_seq += 1;
        if let Some(key) = &key {
            self.pending_keys.insert(
                key.name().to_string(),
                PendingKey {
                    id,
                    fire_at,
                    revision: key.revision().map(String::from),
                },
            );
        }
        self.pending.insert(id, key.clone());
        self.heap.push(Reverse(QueuedJob {
            fire_at,
            seq,
            id,
            key,
            task,
        }));

        if replaced {
            Submission::Rescheduled(id)
        } else {
            Submission::Scheduled(id)
        }
    }

    pub fn cancel(&mut self, id: &JobId) -> bool {
        let key = match self.pending.remove(id) {
            Some(key) => key,
            None => return false,
        };
        if let Some(key) = key {
            if matches!(self.pending_keys.get(key.name()), Some(pending) if pending.id == *id) {
                self.pending_keys.remove(key.name());
            }
        }
        self.cancelled.insert(*id);
        true
    }

    /// Cancels the pending job holding the key called `name`, if any, unless
    /// it fires at `keep_at`
    pub fn cancel_key(&mut self, name: &str, keep_at: Option<DateTime<Utc>>) -> Option<JobId> {
        let pending = self.pending_keys.get(name)?;
        if Some(pending.fire_at) == keep_at {
            return None;
        }
        let id = pending.id;
        self.cancel(&id).then_some(id)
    }

    /// Removes every job due at `now`, earliest first
    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Vec<QueuedJob> {
        let mut due = Vec::new();
        while matches!(self.heap.peek(), Some(Reverse(job)) if job.fire_at <= now) {
            let Reverse(job) = match self.heap.pop() {
                Some(job) => job,
                None => break,
            };
            if self.cancelled.remove(&job.id) {
                continue;
            }
            self.pending.remove(&job.id);
            if let Some(key) = &job.key {
                self.pending_keys.remove(key.name());
                self.fired_keys.insert((key.name().to_string(), job.fire_at));
            }
            due.push(job);
        }
        due
    }

    pub fn next_fire_at(&mut self) -> Option<DateTime<Utc>> {
        // Drop cancelled jobs so they do not shorten the dispatcher's sleep
        while let Some(Reverse(job)) = self.heap.peek() {
            if !self.cancelled.contains(&job.id) {
                return Some(job.fire_at);
            }
            if let Some(Reverse(job)) = self.heap.pop() {
                self.cancelled.remove(&job.id);
            }
        }
        None
    }

    pub fn forget_fired_before(&mut self, before: DateTime<Utc>) {
        self.fired_keys.retain(|(_, fired_at)| *fired_at >= before);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
