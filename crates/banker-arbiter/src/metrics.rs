//! Cumulative counters for request arbitration.
//!
//! [`ArbiterMetrics`] is updated by every arbiter operation and read back
//! by hosts for telemetry. Nothing here influences decisions.

/// Counters accumulated over the lifetime of an arbiter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArbiterMetrics {
    /// Total `request()` calls, including contract violations.
    pub requests: u64,
    /// Requests committed.
    pub granted: u64,
    /// Requests denied because they exceed the remaining need.
    pub denied_exceeds_max_claim: u64,
    /// Requests denied because too few units are available.
    pub denied_insufficient: u64,
    /// Requests denied because the resulting state would be unsafe.
    pub denied_unsafe: u64,
    /// Speculative grants undone. Equals `denied_unsafe` unless a
    /// contract violation struck after speculation began.
    pub rollbacks: u64,
    /// Successful partial or full releases (completions included).
    pub releases: u64,
    /// Successful completions.
    pub completions: u64,
    /// Calls rejected as contract violations.
    pub contract_violations: u64,
    /// Wall-clock time of the most recent request, in microseconds.
    pub last_request_us: u64,
}

impl ArbiterMetrics {
    /// Total business denials.
    pub fn denied(&self) -> u64 {
        self.denied_exceeds_max_claim + self.denied_insufficient + self.denied_unsafe
    }
}
