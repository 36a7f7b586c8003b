use thiserror::Error;

/// Errors reported by the admission queue and the resource model.
///
/// Every failure here is local to the operation that raised it: no variant
/// indicates corrupted shared state, and callers may retry after re-deriving
/// their inputs (e.g. re-decoding an offer after `ResourceExhausted`).
#[derive(Debug, Error)]
pub enum Error {
    /// A `Range` was constructed with `begin > end`.
    #[error("invalid port range: begin {begin} > end {end}")]
    InvalidRange { begin: u64, end: u64 },

    /// An elastic demand was constructed with `min > max` or a negative min.
    #[error("invalid elastic demand: min {min} must be >= 0 and <= max {max}")]
    InvalidDemand { min: f64, max: f64 },

    /// A `cut` asked for more of one dimension than the receiver holds.
    #[error("resource exhausted: requested {requested} {dimension}, only {available} available")]
    ResourceExhausted {
        dimension: &'static str,
        requested: f64,
        available: f64,
    },

    /// A bounded queue with the `Reject` policy is at capacity.
    #[error("queue is full (capacity {0})")]
    QueueFull(usize),

    /// A blocked `push` was woken by `close()`; the queue is unmodified.
    #[error("push interrupted: queue closed while waiting for capacity")]
    Interrupted,

    /// A resource holds (or an offer advertises) overlapping port ranges.
    #[error("overlapping port ranges: [{0}] and [{1}]")]
    OverlappingRanges(String, String),

    /// A wire offer could not be aggregated into a `Resource`.
    #[error("malformed offer: {0}")]
    MalformedOffer(String),
}

pub type Result<T> = std::result::Result<T, Error>;
