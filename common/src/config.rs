use std::time::Duration;

/// Tuning knobs for host directory resolution.
///
/// The defaults are the values the platform has been operated with: a
/// fan-out threshold of 10 nodes and a 10 000-entry cloud area name cache
/// refreshed hourly.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Topology batches smaller than this resolve sequentially on the
    /// caller's task; larger batches fan out onto the worker pool.
    pub fan_out_threshold: usize,

    /// Maximum number of in-flight fan-out tasks.
    ///
    /// The pool is shared across calls; there is no per-call isolation.
    pub worker_capacity: usize,

    /// Upper bound for a single fan-out task. A node that cannot be
    /// resolved in time degrades to an empty host list.
    pub task_timeout: Duration,

    /// Maximum number of cached cloud area names.
    pub cache_capacity: u64,

    /// Cloud area names expire this long after being written, regardless
    /// of how often they are read.
    pub cache_ttl: Duration,

    /// Bulk name lookups slower than this are logged as warnings.
    pub slow_lookup_warn: Duration,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            fan_out_threshold: 10,
            worker_capacity: 20,
            task_timeout: Duration::from_secs(10),
            cache_capacity: 10_000,
            cache_ttl: Duration::from_secs(3_600),
            slow_lookup_warn: Duration::from_secs(1),
        }
    }
}
