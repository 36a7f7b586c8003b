use crate::core::job::Job;
use crate::core::queue::JobQueue;
use crate::core::wire::{self, WireResource};
use crate::error::Result;
use serde::Serialize;
use std::sync::Arc;

/// A concrete task launch: an admitted job plus the wire-format resource
/// entries describing its grant, ready to hand to the cluster manager.
#[derive(Debug, Clone, Serialize)]
pub struct TaskAssignment {
    pub job: Job,
    pub resources: Vec<WireResource>,
}

/// Matches resource offers against the shared admission queue.
///
/// Owns no state beyond a handle to the queue; all capacity bookkeeping for a
/// single offer happens locally while the offer is being carved up.
pub struct Dispatcher {
    queue: Arc<JobQueue>,
}

impl Dispatcher {
    pub fn new(queue: Arc<JobQueue>) -> Self {
        Self { queue }
    }

    pub fn queue(&self) -> &JobQueue {
        &self.queue
    }

    /// Handle one resource offer: decode it, admit the queued prefix that
    /// fits its cpu/mem budget, and carve a concrete grant for each admitted
    /// job out of the offered capacity.
    ///
    /// Every admitted job is granted its max demand, except the single
    /// elastic-tail admission, which receives whatever slack is left
    /// (always at least its min demand, by the admission condition).
    pub fn handle_offer(&self, offer: &[WireResource]) -> Result<Vec<TaskAssignment>> {
        let available = wire::decode(offer)?;
        let admitted = self
            .queue
            .pop_many(available.cpu(), available.mem_mb());
        if admitted.is_empty() {
            tracing::debug!(
                cpu = available.cpu(),
                mem_mb = available.mem_mb(),
                "no queued job fits this offer"
            );
            return Ok(Vec::new());
        }

        let mut remaining = available;
        let mut assignments = Vec::with_capacity(admitted.len());
        for job in admitted {
            let cpu = job.cpu.max().min(remaining.cpu());
            let mem_mb = job.mem_mb.max().min(remaining.mem_mb());
            let (grant, rest) = remaining.split(cpu, mem_mb, 0, 0, 0)?;
            remaining = rest;
            tracing::info!(
                job_id = job.id,
                cpu = grant.cpu(),
                mem_mb = grant.mem_mb(),
                "dispatching job"
            );
            assignments.push(TaskAssignment {
                resources: wire::construct(grant.cpu(), grant.mem_mb()),
                job,
            });
        }
        Ok(assignments)
    }
}
