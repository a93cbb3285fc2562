//! Thread-safe handle over a [`RequestArbiter`].
//!
//! One mutex guards the whole arbiter. Each operation holds it from
//! validation through speculation, safety check and commit or rollback,
//! so no other thread can observe or interleave with a speculative grant.

use std::sync::{Arc, Mutex, MutexGuard};

use banker_core::{ContractViolation, ProcessId, RequestOutcome, ResourceVector, SafetyResult};

use crate::arbiter::RequestArbiter;
use crate::metrics::ArbiterMetrics;
use crate::state::SystemState;

// Compile-time assertion: SharedArbiter can be sent to and shared
// between threads.
const _: () = {
    #[allow(dead_code)]
    fn assert_send_sync<T: Send + Sync>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send_sync::<SharedArbiter>();
    }
};

/// Cloneable, thread-safe handle to one [`RequestArbiter`].
///
/// A panic while the lock is held poisons it; every later call then
/// fails with [`ContractViolation::Poisoned`] rather than touching
/// possibly half-updated tables.
#[derive(Clone, Debug)]
pub struct SharedArbiter {
    inner: Arc<Mutex<RequestArbiter>>,
}

impl SharedArbiter {
    /// Wrap an arbiter for shared use.
    pub fn new(arbiter: RequestArbiter) -> Self {
        Self {
            inner: Arc::new(Mutex::new(arbiter)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, RequestArbiter>, ContractViolation> {
        self.inner.lock().map_err(|_| ContractViolation::Poisoned)
    }

    /// See [`RequestArbiter::request`].
    pub fn request(
        &self,
        process: ProcessId,
        req: &ResourceVector,
    ) -> Result<RequestOutcome, ContractViolation> {
        self.lock()?.request(process, req)
    }

    /// See [`RequestArbiter::release`].
    pub fn release(&self, process: ProcessId, units: &ResourceVector) -> Result<(), ContractViolation> {
        self.lock()?.release(process, units)
    }

    /// See [`RequestArbiter::complete`].
    pub fn complete(&self, process: ProcessId) -> Result<ResourceVector, ContractViolation> {
        self.lock()?.complete(process)
    }

    /// See [`RequestArbiter::check_safe`].
    pub fn check_safe(&self) -> Result<SafetyResult, ContractViolation> {
        self.lock()?.check_safe()
    }

    /// Owned copy of the current tables.
    pub fn snapshot(&self) -> Result<SystemState, ContractViolation> {
        Ok(self.lock()?.state().clone())
    }

    /// Owned copy of the current counters.
    pub fn metrics(&self) -> Result<ArbiterMetrics, ContractViolation> {
        Ok(self.lock()?.metrics().clone())
    }

    /// Recover the arbiter if this is the last handle.
    ///
    /// Returns `Err(self)` while other clones are alive. A poisoned lock
    /// yields the arbiter anyway, since the caller takes sole ownership.
    pub fn try_into_inner(self) -> Result<RequestArbiter, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => Ok(mutex.into_inner().unwrap_or_else(|e| e.into_inner())),
            Err(inner) => Err(Self { inner }),
        }
    }
}

impl From<RequestArbiter> for SharedArbiter {
    fn from(arbiter: RequestArbiter) -> Self {
        Self::new(arbiter)
    }
}
