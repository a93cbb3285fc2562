//! Grant-or-deny arbitration of resource requests.
//!
//! [`request`] validates a request against the process's remaining need
//! and the available units, speculatively applies it, runs the safety
//! check on the speculative state, and either commits or rolls back.
//! [`RequestArbiter`] owns a [`SystemState`] exclusively and adds
//! releases, metrics and configurable denial logging on top.

use std::time::Instant;

use banker_core::{
    ContractViolation, DenialReason, ProcessId, RequestOutcome, ResourceId, ResourceVector,
    SafetyResult,
};
use banker_safety::{check_safe, derive_need};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, SystemConfig};
use crate::metrics::ArbiterMetrics;
use crate::state::SystemState;
use crate::transaction::Speculation;

/// Decide a request from `process` against `state`, committing it only if
/// the resulting state is safe.
///
/// Validation order, first failure wins, nothing mutated before step 5:
///
/// 1. `process` names a row and `req` has one component per resource
///    class, else `Err(ContractViolation)`.
/// 2. `Need[process]` is derived.
/// 3. `req > Need[process]` anywhere: `Denied(ExceedsMaxClaim)`.
/// 4. `req > Available` anywhere: `Denied(InsufficientResources)`.
/// 5. Apply speculatively and check safety. `Safe` commits and returns
///    `Granted` with the safe sequence of the new state; `Unsafe` restores
///    the exact pre-call state and returns `Denied(UnsafeResultingState)`.
///
/// Denials are logged at `info`.
///
/// # Examples
///
/// ```
/// use banker_arbiter::{request, SystemState};
/// use banker_core::{DenialReason, Matrix, ProcessId, RequestOutcome, ResourceVector};
///
/// let mut state = SystemState::new(
///     ResourceVector::from([1]),
///     Matrix::from_rows([[2], [2]]).unwrap(),
///     Matrix::from_rows([[1], [0]]).unwrap(),
/// )
/// .unwrap();
///
/// // Handing P1 the last unit would leave both processes stuck.
/// let outcome = request(&mut state, ProcessId(1), &ResourceVector::from([1])).unwrap();
/// assert_eq!(outcome, RequestOutcome::Denied(DenialReason::UnsafeResultingState));
/// assert_eq!(state.available().as_slice(), &[1]);
/// ```
pub fn request(
    state: &mut SystemState,
    process: ProcessId,
    req: &ResourceVector,
) -> Result<RequestOutcome, ContractViolation> {
    let mut speculated = false;
    let result = arbitrate(state, process, req, &mut speculated);
    log_outcome(process, req, &result, true);
    result
}

fn arbitrate(
    state: &mut SystemState,
    process: ProcessId,
    req: &ResourceVector,
    speculated: &mut bool,
) -> Result<RequestOutcome, ContractViolation> {
    state.check_process(process)?;
    state.check_arity(req)?;

    let need = state.need_row(process)?;
    if !req.fits_within(need.as_slice()) {
        return Ok(RequestOutcome::Denied(DenialReason::ExceedsMaxClaim));
    }
    if !req.fits_within(state.available().as_slice()) {
        return Ok(RequestOutcome::Denied(DenialReason::InsufficientResources));
    }

    let speculation = Speculation::begin(state, process, req)?;
    *speculated = true;
    let s = speculation.state();
    let need = derive_need(s.max_demand(), s.allocation())?;
    match check_safe(s.available(), &need, s.allocation())? {
        SafetyResult::Safe(sequence) => {
            speculation.commit();
            Ok(RequestOutcome::Granted(sequence))
        }
        // Dropping the speculation restores the saved tables.
        SafetyResult::Unsafe => Ok(RequestOutcome::Denied(DenialReason::UnsafeResultingState)),
    }
}

fn log_outcome(
    process: ProcessId,
    req: &ResourceVector,
    result: &Result<RequestOutcome, ContractViolation>,
    log_denials: bool,
) {
    match result {
        Ok(RequestOutcome::Granted(sequence)) => {
            debug!(%process, request = %req, %sequence, "request granted");
        }
        Ok(RequestOutcome::Denied(reason)) if log_denials => {
            info!(%process, request = %req, %reason, "request denied");
        }
        Ok(RequestOutcome::Denied(reason)) => {
            debug!(%process, request = %req, %reason, "request denied");
        }
        Err(error) => {
            warn!(%process, request = %req, %error, "request rejected");
        }
    }
}

// ── RequestArbiter ──────────────────────────────────────────────────

/// Exclusive owner of a [`SystemState`] that serializes all mutation
/// through request, release and completion.
///
/// All mutating methods take `&mut self`, so the borrow checker enforces
/// that one operation completes (commit or rollback) before the next
/// begins. For multi-threaded hosts wrap it in a
/// [`SharedArbiter`](crate::SharedArbiter).
#[derive(Debug)]
pub struct RequestArbiter {
    state: SystemState,
    process_names: Vec<String>,
    resource_names: Vec<String>,
    log_denials: bool,
    metrics: ArbiterMetrics,
}

impl RequestArbiter {
    /// Create an arbiter from a [`SystemConfig`].
    ///
    /// Validates the configuration and builds the accounting tables.
    pub fn new(config: SystemConfig) -> Result<Self, ConfigError> {
        let state = config.build_state()?;
        Ok(Self {
            state,
            process_names: config.processes.into_iter().map(|p| p.name).collect(),
            resource_names: config.resources.into_keys().collect(),
            log_denials: config.log_denials,
            metrics: ArbiterMetrics::default(),
        })
    }

    /// Create an arbiter over already-assembled tables, with no names.
    pub fn from_state(state: SystemState) -> Self {
        Self {
            state,
            process_names: Vec::new(),
            resource_names: Vec::new(),
            log_denials: true,
            metrics: ArbiterMetrics::default(),
        }
    }

    /// Decide a request. See [`request`] for the full contract.
    pub fn request(
        &mut self,
        process: ProcessId,
        req: &ResourceVector,
    ) -> Result<RequestOutcome, ContractViolation> {
        let start = Instant::now();
        let mut speculated = false;
        let result = arbitrate(&mut self.state, process, req, &mut speculated);
        log_outcome(process, req, &result, self.log_denials);

        let m = &mut self.metrics;
        m.requests += 1;
        m.last_request_us = start.elapsed().as_micros() as u64;
        match &result {
            Ok(RequestOutcome::Granted(_)) => m.granted += 1,
            Ok(RequestOutcome::Denied(DenialReason::ExceedsMaxClaim)) => {
                m.denied_exceeds_max_claim += 1
            }
            Ok(RequestOutcome::Denied(DenialReason::InsufficientResources)) => {
                m.denied_insufficient += 1
            }
            Ok(RequestOutcome::Denied(DenialReason::UnsafeResultingState)) => {
                m.denied_unsafe += 1
            }
            Err(_) => m.contract_violations += 1,
        }
        if speculated && !matches!(result, Ok(RequestOutcome::Granted(_))) {
            m.rollbacks += 1;
        }
        result
    }

    /// Return `units` held by `process` to the available pool.
    ///
    /// Releasing can only grow `Available` and shrink `Allocation`, so a
    /// safe state stays safe and no check is run.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::ReleaseExceedsAllocation`] if `process` holds
    /// fewer units than it tries to release; nothing is released then.
    pub fn release(
        &mut self,
        process: ProcessId,
        units: &ResourceVector,
    ) -> Result<(), ContractViolation> {
        match self.state.release(process, units) {
            Ok(()) => {
                self.metrics.releases += 1;
                debug!(%process, units = %units, available = %self.state.available(), "released");
                Ok(())
            }
            Err(error) => {
                self.metrics.contract_violations += 1;
                warn!(%process, units = %units, %error, "release rejected");
                Err(error)
            }
        }
    }

    /// Reclaim everything `process` holds, as when it runs to completion.
    ///
    /// Returns the released units. The process keeps its declared maximum
    /// and may request again afterwards.
    pub fn complete(&mut self, process: ProcessId) -> Result<ResourceVector, ContractViolation> {
        let held = match self.state.allocation().row_vector(process) {
            Some(held) => held,
            None => {
                self.metrics.contract_violations += 1;
                let error = ContractViolation::ProcessOutOfRange {
                    process,
                    process_count: self.state.process_count(),
                };
                warn!(%process, %error, "completion rejected");
                return Err(error);
            }
        };
        self.release(process, &held)?;
        self.metrics.completions += 1;
        Ok(held)
    }

    /// Run the safety check against the current state.
    pub fn check_safe(&self) -> Result<SafetyResult, ContractViolation> {
        let need = derive_need(self.state.max_demand(), self.state.allocation())?;
        check_safe(self.state.available(), &need, self.state.allocation())
    }

    /// Read-only view of the accounting tables.
    pub fn state(&self) -> &SystemState {
        &self.state
    }

    /// Counters accumulated so far.
    pub fn metrics(&self) -> &ArbiterMetrics {
        &self.metrics
    }

    /// Id of the process declared as `name`, when built from a config.
    pub fn process_id(&self, name: &str) -> Option<ProcessId> {
        self.process_names
            .iter()
            .position(|n| n == name)
            .map(|i| ProcessId(i as u32))
    }

    /// Declared name of `process`, when built from a config.
    pub fn process_name(&self, process: ProcessId) -> Option<&str> {
        self.process_names.get(process.index()).map(String::as_str)
    }

    /// Id of the resource class declared as `name`, when built from a config.
    pub fn resource_id(&self, name: &str) -> Option<ResourceId> {
        self.resource_names
            .iter()
            .position(|n| n == name)
            .map(|i| ResourceId(i as u32))
    }
}
