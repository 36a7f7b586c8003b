use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Port ranges per resource are almost always few; keep them inline.
pub type RangeSet = SmallVec<[Range; 4]>;

/// A closed interval `[begin, end]` of port numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Range {
    begin: u64,
    end: u64,
}

impl Range {
    pub fn new(begin: u64, end: u64) -> Result<Self> {
        if begin > end {
            return Err(Error::InvalidRange { begin, end });
        }
        Ok(Self { begin, end })
    }

    pub fn begin(&self) -> u64 {
        self.begin
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of ports covered by this range.
    pub fn width(&self) -> u64 {
        self.end - self.begin + 1
    }

    fn overlaps(&self, other: &Range) -> bool {
        self.begin <= other.end && other.begin <= self.end
    }

    /// Split off the lowest `amount` ports, returning the taken sub-range and
    /// the remainder fragment (None when the range is consumed exactly).
    ///
    /// Caller guarantees `1 <= amount <= width()`.
    pub(crate) fn take(&self, amount: u64) -> (Range, Option<Range>) {
        debug_assert!(amount >= 1 && amount <= self.width());
        if amount == self.width() {
            return (*self, None);
        }
        let taken = Range {
            begin: self.begin,
            end: self.begin + amount - 1,
        };
        let rest = Range {
            begin: self.begin + amount,
            end: self.end,
        };
        (taken, Some(rest))
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.begin, self.end)
    }
}

/// An immutable snapshot of available or granted capacity.
///
/// Scalar dimensions (cpu, memory, disk, gpus) plus a sorted set of
/// non-overlapping port ranges. Every transformation produces a new value;
/// nothing here mutates in place, so no locking is needed around resource
/// accounting itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    cpu: f64,
    mem_mb: u64,
    disk_mb: u64,
    gpus: u32,
    ports: RangeSet,
}

impl Resource {
    pub fn new(
        cpu: f64,
        mem_mb: u64,
        disk_mb: u64,
        gpus: u32,
        ports: impl IntoIterator<Item = Range>,
    ) -> Result<Self> {
        if !cpu.is_finite() || cpu < 0.0 {
            return Err(Error::MalformedOffer(format!("negative cpus: {cpu}")));
        }
        let mut ports: RangeSet = ports.into_iter().collect();
        ports.sort_unstable();
        for pair in ports.windows(2) {
            if pair[0].overlaps(&pair[1]) {
                return Err(Error::OverlappingRanges(
                    pair[0].to_string(),
                    pair[1].to_string(),
                ));
            }
        }
        Ok(Self {
            cpu,
            mem_mb,
            disk_mb,
            gpus,
            ports,
        })
    }

    pub fn cpu(&self) -> f64 {
        self.cpu
    }

    pub fn mem_mb(&self) -> u64 {
        self.mem_mb
    }

    pub fn disk_mb(&self) -> u64 {
        self.disk_mb
    }

    pub fn gpus(&self) -> u32 {
        self.gpus
    }

    /// Port ranges, sorted ascending.
    pub fn ports(&self) -> &[Range] {
        &self.ports
    }

    /// Total number of ports across all ranges.
    pub fn port_amount(&self) -> u64 {
        self.ports.iter().map(Range::width).sum()
    }

    /// Extract a sub-resource with exactly the requested amounts.
    ///
    /// Ports are selected deterministically, lowest-numbered first, splitting
    /// a range into a taken and a remaining fragment when it is larger than
    /// what is still needed. Fails with `ResourceExhausted` when any dimension
    /// falls short; never returns less than requested.
    ///
    /// The receiver is not modified. Callers tracking remaining capacity
    /// across successive cuts should use [`Resource::split`].
    pub fn cut(
        &self,
        cpu: f64,
        mem_mb: u64,
        gpus: u32,
        port_amount: u64,
        disk_mb: u64,
    ) -> Result<Resource> {
        self.split(cpu, mem_mb, gpus, port_amount, disk_mb)
            .map(|(grant, _rest)| grant)
    }

    /// Like [`Resource::cut`], but also returns what is left of the receiver,
    /// so one offer can be carved into several grants without re-decoding.
    pub fn split(
        &self,
        cpu: f64,
        mem_mb: u64,
        gpus: u32,
        port_amount: u64,
        disk_mb: u64,
    ) -> Result<(Resource, Resource)> {
        if cpu > self.cpu {
            return Err(Error::ResourceExhausted {
                dimension: "cpus",
                requested: cpu,
                available: self.cpu,
            });
        }
        if mem_mb > self.mem_mb {
            return Err(Error::ResourceExhausted {
                dimension: "mem",
                requested: mem_mb as f64,
                available: self.mem_mb as f64,
            });
        }
        if disk_mb > self.disk_mb {
            return Err(Error::ResourceExhausted {
                dimension: "disk",
                requested: disk_mb as f64,
                available: self.disk_mb as f64,
            });
        }
        if gpus > self.gpus {
            return Err(Error::ResourceExhausted {
                dimension: "gpus",
                requested: gpus as f64,
                available: self.gpus as f64,
            });
        }
        if port_amount > self.port_amount() {
            return Err(Error::ResourceExhausted {
                dimension: "ports",
                requested: port_amount as f64,
                available: self.port_amount() as f64,
            });
        }

        let mut needed = port_amount;
        let mut granted = RangeSet::new();
        let mut rest = RangeSet::new();
        for range in &self.ports {
            if needed == 0 {
                rest.push(*range);
            } else if range.width() <= needed {
                needed -= range.width();
                granted.push(*range);
            } else {
                let (taken, remainder) = range.take(needed);
                needed = 0;
                granted.push(taken);
                if let Some(remainder) = remainder {
                    rest.push(remainder);
                }
            }
        }

        let grant = Resource {
            cpu,
            mem_mb,
            disk_mb,
            gpus,
            ports: granted,
        };
        let remaining = Resource {
            cpu: self.cpu - cpu,
            mem_mb: self.mem_mb - mem_mb,
            disk_mb: self.disk_mb - disk_mb,
            gpus: self.gpus - gpus,
            ports: rest,
        };
        Ok((grant, remaining))
    }
}
