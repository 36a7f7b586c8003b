use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A `[min, max]` elastic demand pair.
///
/// `min` is the smallest grant the job can run with, `max` the amount it can
/// usefully consume. Validated at construction; `min <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Elastic<T> {
    min: T,
    max: T,
}

impl<T: Copy> Elastic<T> {
    pub fn min(&self) -> T {
        self.min
    }

    pub fn max(&self) -> T {
        self.max
    }
}

impl Elastic<f64> {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(0.0..=max).contains(&min) || !max.is_finite() {
            return Err(Error::InvalidDemand { min, max });
        }
        Ok(Self { min, max })
    }
}

impl Elastic<u64> {
    pub fn new(min: u64, max: u64) -> Result<Self> {
        if min > max {
            return Err(Error::InvalidDemand {
                min: min as f64,
                max: max as f64,
            });
        }
        Ok(Self { min, max })
    }
}

/// A unit of work awaiting dispatch.
///
/// The id is issued by `JobQueue::issue_job_id` at submission time, never by
/// the builder. A job carries no grant of its own; the concrete resource
/// assignment is produced during dispatch and owned by the dispatch caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: u32,
    pub name: Option<String>,
    pub command: Option<String>,
    pub cpu: Elastic<f64>,
    pub mem_mb: Elastic<u64>,
}

impl Job {
    pub fn builder() -> JobBuilder {
        JobBuilder::new()
    }
}

#[derive(Default)]
pub struct JobBuilder {
    name: Option<String>,
    command: Option<String>,
    cpu_min: f64,
    cpu_max: f64,
    mem_min_mb: u64,
    mem_max_mb: u64,
}

impl JobBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Elastic cpu demand in cores.
    pub fn cpu(mut self, min: f64, max: f64) -> Self {
        self.cpu_min = min;
        self.cpu_max = max;
        self
    }

    /// Elastic memory demand in MB.
    pub fn mem_mb(mut self, min: u64, max: u64) -> Self {
        self.mem_min_mb = min;
        self.mem_max_mb = max;
        self
    }

    /// Fixed (non-elastic) demand: min == max for both dimensions.
    pub fn fixed(self, cpu: f64, mem_mb: u64) -> Self {
        self.cpu(cpu, cpu).mem_mb(mem_mb, mem_mb)
    }

    pub fn build(self) -> Result<Job> {
        Ok(Job {
            id: 0,
            name: self.name,
            command: self.command,
            cpu: Elastic::<f64>::new(self.cpu_min, self.cpu_max)?,
            mem_mb: Elastic::<u64>::new(self.mem_min_mb, self.mem_max_mb)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_validates_demands() {
        let job = Job::builder()
            .name("train")
            .command("python train.py")
            .cpu(1.0, 2.0)
            .mem_mb(100, 200)
            .build()
            .unwrap();
        assert_eq!(job.id, 0);
        assert_eq!(job.cpu.min(), 1.0);
        assert_eq!(job.cpu.max(), 2.0);
        assert_eq!(job.mem_mb.max(), 200);
    }

    #[test]
    fn test_builder_rejects_inverted_demand() {
        let err = Job::builder().cpu(2.0, 1.0).build().unwrap_err();
        assert!(matches!(err, Error::InvalidDemand { .. }));

        let err = Job::builder().mem_mb(512, 256).build().unwrap_err();
        assert!(matches!(err, Error::InvalidDemand { .. }));
    }

    #[test]
    fn test_builder_rejects_negative_cpu() {
        let err = Job::builder().cpu(-1.0, 1.0).build().unwrap_err();
        assert!(matches!(err, Error::InvalidDemand { .. }));
    }

    #[test]
    fn test_fixed_demand_is_degenerate_elastic() {
        let job = Job::builder().fixed(0.5, 64).build().unwrap();
        assert_eq!(job.cpu.min(), job.cpu.max());
        assert_eq!(job.mem_mb.min(), job.mem_mb.max());
    }
}
