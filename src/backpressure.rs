//! Admission check shedding informational events under load.

/// Default pending-queue depth at which informational events are shed.
pub const DEFAULT_QUEUE_LIMIT: usize = 1000;

/// Point-in-time admission check against the handler's own backlog.
///
/// The gate is stateless: each call compares the supplied depth snapshot with
/// the limit, with no hysteresis between calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackpressureGate {
    limit: usize,
}

impl BackpressureGate {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Whether an event may proceed while `depth` events are still pending.
    pub fn admits(&self, depth: usize) -> bool {
        depth < self.limit
    }
}

impl Default for BackpressureGate {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_LIMIT)
    }
}
