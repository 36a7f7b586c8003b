use crate::core::job::Job;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use strum::Display;

/// What `push` does when a bounded queue is at capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum BackpressurePolicy {
    /// Block the caller until space frees up or the queue is closed.
    #[default]
    #[strum(to_string = "block")]
    Block,
    /// Fail immediately with `QueueFull`.
    #[strum(to_string = "reject")]
    Reject,
}

struct Inner {
    jobs: VecDeque<Job>,
    closed: bool,
}

/// FIFO admission queue of pending jobs with monotonic id issuance.
///
/// One instance is shared (via `Arc`) between the submission path and the
/// offer-handling path. `push`/`pop` are independently safe and may interleave
/// with an in-progress [`JobQueue::pop_many`]; only concurrent `pop_many`
/// callers are serialized against each other, so two offers never race their
/// admission decisions against the same head job.
pub struct JobQueue {
    inner: Mutex<Inner>,
    /// Signalled whenever space frees up or the queue closes.
    space: Condvar,
    /// Serializes the peek-decide-dequeue sequence of `pop_many` only.
    dispatch: Mutex<()>,
    next_id: AtomicU32,
    capacity: Option<usize>,
    policy: BackpressurePolicy,
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl JobQueue {
    /// An unbounded queue; `push` never blocks.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                jobs: VecDeque::new(),
                closed: false,
            }),
            space: Condvar::new(),
            dispatch: Mutex::new(()),
            next_id: AtomicU32::new(1),
            capacity: None,
            policy: BackpressurePolicy::default(),
        }
    }

    /// A queue holding at most `capacity` jobs, applying `policy` on overflow.
    pub fn bounded(capacity: usize, policy: BackpressurePolicy) -> Self {
        Self {
            capacity: Some(capacity),
            policy,
            ..Self::new()
        }
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock means a panic mid-mutation elsewhere; the deque
        // itself is still structurally sound, so keep serving.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Atomically issue the next job id. Ids start at 1, are strictly
    /// increasing, and are never reused within the process lifetime.
    pub fn issue_job_id(&self) -> u32 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Enqueue a job at the tail.
    ///
    /// Unbounded queues never block. Bounded queues either fail with
    /// `QueueFull` (Reject) or block the calling thread until space frees up
    /// (Block); a blocked push woken by [`JobQueue::close`] fails with
    /// `Interrupted` and leaves the queue unmodified.
    pub fn push(&self, job: Job) -> Result<()> {
        let mut inner = self.lock_inner();
        if inner.closed {
            return Err(Error::Interrupted);
        }
        if let Some(capacity) = self.capacity {
            match self.policy {
                BackpressurePolicy::Reject => {
                    if inner.jobs.len() >= capacity {
                        return Err(Error::QueueFull(capacity));
                    }
                }
                BackpressurePolicy::Block => {
                    while inner.jobs.len() >= capacity && !inner.closed {
                        inner = self
                            .space
                            .wait(inner)
                            .unwrap_or_else(PoisonError::into_inner);
                    }
                    if inner.closed {
                        return Err(Error::Interrupted);
                    }
                }
            }
        }
        tracing::debug!(job_id = job.id, "job enqueued");
        inner.jobs.push_back(job);
        Ok(())
    }

    /// Remove and return the head job, if any. Never blocks.
    pub fn pop(&self) -> Option<Job> {
        let job = self.lock_inner().jobs.pop_front();
        if job.is_some() {
            self.space.notify_one();
        }
        job
    }

    /// Dequeue the FIFO prefix of jobs that fits the offered budget.
    ///
    /// Greedy and head-of-line: a job whose max demand fits is admitted at
    /// max and iteration continues; a job whose min demand strictly fits the
    /// remaining slack is admitted as the single elastic tail and iteration
    /// stops; anything else stops without dequeuing. No job is ever skipped
    /// over, preserving strict submission order.
    pub fn pop_many(&self, cpu_budget: f64, mem_budget: u64) -> Vec<Job> {
        let _dispatch = self
            .dispatch
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        enum Fit {
            Max,
            ElasticTail,
        }

        let mut admitted = Vec::new();
        let mut cpu_used = 0.0_f64;
        let mut mem_used = 0_u64;
        loop {
            let mut inner = self.lock_inner();
            let Some(head) = inner.jobs.front() else {
                break;
            };
            let fit = if cpu_used + head.cpu.max() <= cpu_budget
                && mem_used + head.mem_mb.max() <= mem_budget
            {
                Fit::Max
            } else if cpu_used + head.cpu.min() < cpu_budget
                && mem_used + head.mem_mb.min() < mem_budget
            {
                Fit::ElasticTail
            } else {
                tracing::debug!(
                    job_id = head.id,
                    cpu_used,
                    mem_used,
                    "head does not fit remaining budget, stopping admission"
                );
                break;
            };

            let Some(job) = inner.jobs.pop_front() else {
                break;
            };
            drop(inner);
            self.space.notify_one();

            match fit {
                Fit::Max => {
                    cpu_used += job.cpu.max();
                    mem_used += job.mem_mb.max();
                    tracing::debug!(job_id = job.id, cpu_used, mem_used, "admitted at max demand");
                    admitted.push(job);
                }
                Fit::ElasticTail => {
                    // At most one job per call is admitted on its min demand,
                    // to soak up slack a strict max check would leave idle.
                    tracing::debug!(job_id = job.id, "admitted as elastic tail");
                    admitted.push(job);
                    break;
                }
            }
        }
        admitted
    }

    /// A copy of the current queue contents, head first. Not a live view;
    /// may be stale as soon as it returns under concurrent mutation.
    pub fn snapshot(&self) -> Vec<Job> {
        self.lock_inner().jobs.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock_inner().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_inner().jobs.is_empty()
    }

    /// Administrative reset: drop all queued jobs and restart id issuance.
    pub fn clear(&self) {
        let mut inner = self.lock_inner();
        let dropped = inner.jobs.len();
        inner.jobs.clear();
        self.next_id.store(1, Ordering::Relaxed);
        drop(inner);
        if dropped > 0 {
            tracing::info!(dropped, "queue cleared");
            self.space.notify_all();
        }
    }

    /// Close the queue: wake all blocked pushers with `Interrupted` and fail
    /// any subsequent push the same way. Queued jobs remain poppable.
    pub fn close(&self) {
        self.lock_inner().closed = true;
        self.space.notify_all();
    }
}
