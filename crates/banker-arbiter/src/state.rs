//! [`SystemState`]: the `(Available, Allocation, MaxDemand)` triple.

use banker_core::{ContractViolation, Dimension, Matrix, ProcessId, ResourceVector};
use banker_safety::derive_need;

/// The accounting tables for a fixed set of processes and resource classes.
///
/// Invariants, established by [`new()`](SystemState::new) and preserved
/// by every mutation:
///
/// - `Available` has arity N; `Allocation` and `MaxDemand` are P x N.
/// - `Allocation[i] <= MaxDemand[i]` component-wise, so the derived
///   `Need[i] = MaxDemand[i] - Allocation[i]` is never negative.
///
/// Only the arbiter in this crate mutates a `SystemState`. Hosts get read
/// access through the accessors, or an owned copy via `Clone`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SystemState {
    available: ResourceVector,
    max_demand: Matrix,
    allocation: Matrix,
}

impl SystemState {
    /// Build a state from initial tables.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::ShapeMismatch`] if the shapes disagree,
    /// [`ContractViolation::NegativeNeed`] if some process already holds
    /// more than its declared maximum.
    pub fn new(
        available: ResourceVector,
        max_demand: Matrix,
        allocation: Matrix,
    ) -> Result<Self, ContractViolation> {
        max_demand.expect_shape("allocation", &allocation)?;
        if max_demand.resource_count() != available.len() {
            return Err(ContractViolation::ShapeMismatch {
                what: "max_demand",
                dimension: Dimension::Resources,
                expected: available.len(),
                actual: max_demand.resource_count(),
            });
        }
        derive_need(&max_demand, &allocation)?;
        Ok(Self {
            available,
            max_demand,
            allocation,
        })
    }

    /// Units not currently allocated to any process.
    pub fn available(&self) -> &ResourceVector {
        &self.available
    }

    /// Declared upper bound per process.
    pub fn max_demand(&self) -> &Matrix {
        &self.max_demand
    }

    /// Units currently held per process.
    pub fn allocation(&self) -> &Matrix {
        &self.allocation
    }

    /// The derived `Need = MaxDemand - Allocation` matrix.
    pub fn need(&self) -> Matrix {
        // Safety: new() and every mutation keep Allocation <= MaxDemand.
        derive_need(&self.max_demand, &self.allocation)
            .expect("allocation <= max_demand is a SystemState invariant")
    }

    /// Remaining need of one process, or `None` if out of range.
    pub fn need_of(&self, process: ProcessId) -> Option<ResourceVector> {
        self.need_row(process).ok()
    }

    /// `MaxDemand[process] - Allocation[process]`.
    pub(crate) fn need_row(&self, process: ProcessId) -> Result<ResourceVector, ContractViolation> {
        let out_of_range = || ContractViolation::ProcessOutOfRange {
            process,
            process_count: self.process_count(),
        };
        let max = self.max_demand.row_vector(process).ok_or_else(out_of_range)?;
        let held = self.allocation.row(process).ok_or_else(out_of_range)?;
        max.checked_sub(held).map_err(|e| match e {
            ContractViolation::ComponentOverflow { resource } => {
                ContractViolation::NegativeNeed { process, resource }
            }
            other => other,
        })
    }

    /// Number of processes (P).
    pub fn process_count(&self) -> usize {
        self.max_demand.process_count()
    }

    /// Number of resource classes (N).
    pub fn resource_count(&self) -> usize {
        self.available.len()
    }

    /// Fail unless `process` names a row.
    pub fn check_process(&self, process: ProcessId) -> Result<(), ContractViolation> {
        if process.index() >= self.process_count() {
            return Err(ContractViolation::ProcessOutOfRange {
                process,
                process_count: self.process_count(),
            });
        }
        Ok(())
    }

    /// Fail unless `v` has one component per resource class.
    pub fn check_arity(&self, v: &ResourceVector) -> Result<(), ContractViolation> {
        if v.len() != self.resource_count() {
            return Err(ContractViolation::ArityMismatch {
                expected: self.resource_count(),
                actual: v.len(),
            });
        }
        Ok(())
    }

    /// `Available -= req; Allocation[process] += req`, all or nothing.
    ///
    /// The caller has already checked `req <= Need[process]` and
    /// `req <= Available`.
    pub(crate) fn apply_grant(
        &mut self,
        process: ProcessId,
        req: &ResourceVector,
    ) -> Result<(), ContractViolation> {
        let mut available = self.available.clone();
        available.checked_sub_assign(req.as_slice())?;
        self.allocation.checked_add_row(process, req.as_slice())?;
        self.available = available;
        Ok(())
    }

    /// `Allocation[process] -= units; Available += units`, all or nothing.
    pub(crate) fn release(
        &mut self,
        process: ProcessId,
        units: &ResourceVector,
    ) -> Result<(), ContractViolation> {
        let held = self
            .allocation
            .row(process)
            .ok_or(ContractViolation::ProcessOutOfRange {
                process,
                process_count: self.process_count(),
            })?;
        self.check_arity(units)?;
        if let Some(resource) = units.first_exceeding(held) {
            return Err(ContractViolation::ReleaseExceedsAllocation { process, resource });
        }
        let mut available = self.available.clone();
        available.checked_add_assign(units.as_slice())?;
        self.allocation.checked_sub_row(process, units.as_slice())?;
        self.available = available;
        Ok(())
    }

    /// Copy out the parts a speculative grant may touch.
    pub(crate) fn save(&self) -> Saved {
        Saved {
            available: self.available.clone(),
            allocation: self.allocation.clone(),
        }
    }

    /// Put back exactly what [`save()`](Self::save) copied out.
    pub(crate) fn restore(&mut self, saved: Saved) {
        self.available = saved.available;
        self.allocation = saved.allocation;
    }
}

/// The mutable half of a [`SystemState`]; `MaxDemand` never changes.
#[derive(Debug)]
pub(crate) struct Saved {
    available: ResourceVector,
    allocation: Matrix,
}

#[cfg(test)]
mod tests {
    use super::*;
    use banker_core::ResourceId;

    fn classic() -> SystemState {
        SystemState::new(
            ResourceVector::from([3, 3, 2]),
            Matrix::from_rows([[7, 5, 3], [3, 2, 2], [9, 0, 2], [2, 2, 2], [4, 3, 3]]).unwrap(),
            Matrix::from_rows([[0, 1, 0], [2, 0, 0], [3, 0, 2], [2, 1, 1], [0, 0, 2]]).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_allocation_above_max() {
        let err = SystemState::new(
            ResourceVector::from([1, 1]),
            Matrix::from_rows([[1, 1]]).unwrap(),
            Matrix::from_rows([[1, 2]]).unwrap(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ContractViolation::NegativeNeed {
                process: ProcessId(0),
                resource: ResourceId(1)
            }
        );
    }

    #[test]
    fn new_rejects_available_arity_mismatch() {
        let err = SystemState::new(
            ResourceVector::from([1, 1, 1]),
            Matrix::zeros(2, 2),
            Matrix::zeros(2, 2),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ContractViolation::ShapeMismatch {
                what: "max_demand",
                dimension: Dimension::Resources,
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn need_is_derived() {
        let s = classic();
        assert_eq!(s.need_of(ProcessId(1)), Some(ResourceVector::from([1, 2, 2])));
        assert_eq!(s.need_of(ProcessId(5)), None);
        assert_eq!(s.need().row(ProcessId(4)), Some(&[4, 3, 1][..]));
        assert_eq!(s.process_count(), 5);
        assert_eq!(s.resource_count(), 3);
    }

    #[test]
    fn apply_grant_moves_units() {
        let mut s = classic();
        s.apply_grant(ProcessId(1), &ResourceVector::from([1, 0, 2]))
            .unwrap();
        assert_eq!(s.available().as_slice(), &[2, 3, 0]);
        assert_eq!(s.allocation().row(ProcessId(1)), Some(&[3, 0, 2][..]));
    }

    #[test]
    fn save_restore_is_exact() {
        let mut s = classic();
        let before = s.clone();
        let saved = s.save();
        s.apply_grant(ProcessId(3), &ResourceVector::from([0, 1, 1]))
            .unwrap();
        assert_ne!(s, before);
        s.restore(saved);
        assert_eq!(s, before);
    }

    #[test]
    fn release_is_bounded_by_allocation() {
        let mut s = classic();
        let before = s.clone();
        let err = s
            .release(ProcessId(0), &ResourceVector::from([0, 2, 0]))
            .unwrap_err();
        assert_eq!(
            err,
            ContractViolation::ReleaseExceedsAllocation {
                process: ProcessId(0),
                resource: ResourceId(1)
            }
        );
        assert_eq!(s, before);

        s.release(ProcessId(2), &ResourceVector::from([3, 0, 2]))
            .unwrap();
        assert_eq!(s.available().as_slice(), &[6, 3, 4]);
        assert_eq!(s.allocation().row(ProcessId(2)), Some(&[0, 0, 0][..]));
    }
}
