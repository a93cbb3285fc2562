//! Fixed-point safety check over process/resource matrices.
//!
//! # Algorithm
//!
//! ```text
//! work   := Available
//! finish := [false; P]
//! repeat
//!     for i in 0..P (ascending)
//!         if !finish[i] && Need[i] <= work
//!             work += Allocation[i]     // reclamation
//!             finish[i] := true
//!             sequence.push(i)
//! until a full pass finishes nothing new
//! safe iff every finish[i]
//! ```
//!
//! A process finished early in a pass makes its allocation visible to
//! higher-indexed processes in the same pass. Each pass either finishes
//! at least one process or ends the loop, so there are at most `P + 1`
//! passes and the cost is `O(P^2 * N)`.
//!
//! The safe/unsafe verdict does not depend on scan order (finishing a
//! process only ever grows `work`). The returned sequence does, and the
//! fixed ascending scan makes it reproducible for identical inputs.

use banker_core::{
    ContractViolation, Dimension, Matrix, ProcessId, ResourceVector, SafeSequence, SafetyResult,
};
use tracing::debug;

/// Stateless safety checker.
///
/// A zero-sized handle around [`check_safe`] for hosts that prefer to hold
/// the checker as a collaborator value.
#[derive(Clone, Copy, Debug, Default)]
pub struct SafetyChecker;

impl SafetyChecker {
    /// Create a checker.
    pub fn new() -> Self {
        Self
    }

    /// See [`check_safe`].
    pub fn check(
        &self,
        available: &ResourceVector,
        need: &Matrix,
        allocation: &Matrix,
    ) -> Result<SafetyResult, ContractViolation> {
        check_safe(available, need, allocation)
    }
}

/// Determine whether a safe completion ordering exists.
///
/// Returns [`SafetyResult::Safe`] with the first ordering found by an
/// ascending-index scan, or [`SafetyResult::Unsafe`].
///
/// # Errors
///
/// [`ContractViolation::ShapeMismatch`] if `need` and `allocation` do not
/// share a process count, or either disagrees with the arity of
/// `available`. [`ContractViolation::ComponentOverflow`] if reclaimed
/// units would exceed `u32::MAX`. Neither is an "unsafe" verdict.
///
/// # Examples
///
/// ```
/// use banker_core::{Matrix, ResourceVector, SafetyResult, SafeSequence};
/// use banker_safety::check_safe;
///
/// let available = ResourceVector::from([3, 3, 2]);
/// let need = Matrix::from_rows([[7, 4, 3], [1, 2, 2], [6, 0, 0], [0, 1, 1], [4, 3, 1]]).unwrap();
/// let allocation = Matrix::from_rows([[0, 1, 0], [2, 0, 0], [3, 0, 2], [2, 1, 1], [0, 0, 2]]).unwrap();
///
/// let verdict = check_safe(&available, &need, &allocation).unwrap();
/// assert_eq!(verdict, SafetyResult::Safe(SafeSequence::from(vec![1, 3, 4, 0, 2])));
/// ```
pub fn check_safe(
    available: &ResourceVector,
    need: &Matrix,
    allocation: &Matrix,
) -> Result<SafetyResult, ContractViolation> {
    check_shapes(available, need, allocation)?;

    let processes = need.process_count();
    let mut work = available.clone();
    let mut finish = vec![false; processes];
    let mut sequence = Vec::with_capacity(processes);
    let mut passes = 0u32;

    loop {
        passes += 1;
        let mut progressed = false;
        for (i, (need_row, alloc_row)) in need.rows().zip(allocation.rows()).enumerate() {
            if finish[i] || !fits(need_row, work.as_slice()) {
                continue;
            }
            work.checked_add_assign(alloc_row)?;
            finish[i] = true;
            sequence.push(ProcessId(i as u32));
            progressed = true;
        }
        if !progressed || sequence.len() == processes {
            break;
        }
    }

    let safe = sequence.len() == processes;
    debug!(
        processes,
        resources = available.len(),
        passes,
        finished = sequence.len(),
        safe,
        "safety check"
    );

    if safe {
        Ok(SafetyResult::Safe(SafeSequence::new(sequence)))
    } else {
        Ok(SafetyResult::Unsafe)
    }
}

/// Derive `Need = MaxDemand - Allocation`.
///
/// # Errors
///
/// [`ContractViolation::ShapeMismatch`] if the matrices differ in shape;
/// [`ContractViolation::NegativeNeed`] naming the first cell where a
/// process holds more than it declared.
pub fn derive_need(max_demand: &Matrix, allocation: &Matrix) -> Result<Matrix, ContractViolation> {
    max_demand.checked_sub(allocation)
}

fn fits(need_row: &[u32], work: &[u32]) -> bool {
    need_row.iter().zip(work).all(|(n, w)| n <= w)
}

fn check_shapes(
    available: &ResourceVector,
    need: &Matrix,
    allocation: &Matrix,
) -> Result<(), ContractViolation> {
    need.expect_shape("allocation", allocation)?;
    if need.resource_count() != available.len() {
        return Err(ContractViolation::ShapeMismatch {
            what: "need",
            dimension: Dimension::Resources,
            expected: available.len(),
            actual: need.resource_count(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic_available() -> ResourceVector {
        ResourceVector::from([3, 3, 2])
    }

    fn classic_max() -> Matrix {
        Matrix::from_rows([[7, 5, 3], [3, 2, 2], [9, 0, 2], [2, 2, 2], [4, 3, 3]]).unwrap()
    }

    fn classic_allocation() -> Matrix {
        Matrix::from_rows([[0, 1, 0], [2, 0, 0], [3, 0, 2], [2, 1, 1], [0, 0, 2]]).unwrap()
    }

    fn seq(v: &[u32]) -> SafetyResult {
        SafetyResult::Safe(SafeSequence::from(v.to_vec()))
    }

    #[test]
    fn classic_initial_state_is_safe() {
        let need = derive_need(&classic_max(), &classic_allocation()).unwrap();
        let verdict = check_safe(&classic_available(), &need, &classic_allocation()).unwrap();
        assert_eq!(verdict, seq(&[1, 3, 4, 0, 2]));
    }

    #[test]
    fn classic_after_p1_grant_is_safe() {
        // P1 has been granted [1, 0, 2].
        let available = ResourceVector::from([2, 3, 0]);
        let allocation =
            Matrix::from_rows([[0, 1, 0], [3, 0, 2], [3, 0, 2], [2, 1, 1], [0, 0, 2]]).unwrap();
        let need = derive_need(&classic_max(), &allocation).unwrap();
        let verdict = check_safe(&available, &need, &allocation).unwrap();
        assert_eq!(verdict, seq(&[1, 3, 4, 0, 2]));
    }

    #[test]
    fn starved_state_is_unsafe() {
        // P0 has taken [2, 3, 0] from the initial state.
        let available = ResourceVector::from([1, 0, 2]);
        let allocation =
            Matrix::from_rows([[2, 4, 0], [2, 0, 0], [3, 0, 2], [2, 1, 1], [0, 0, 2]]).unwrap();
        let need = derive_need(&classic_max(), &allocation).unwrap();
        assert_eq!(
            check_safe(&available, &need, &allocation).unwrap(),
            SafetyResult::Unsafe
        );
    }

    #[test]
    fn release_from_later_index_unlocks_earlier_on_next_pass() {
        // P1 fits immediately; its release lets P0 finish on pass 2.
        let available = ResourceVector::from([1]);
        let need = Matrix::from_rows([[3], [1]]).unwrap();
        let allocation = Matrix::from_rows([[0], [2]]).unwrap();
        assert_eq!(
            check_safe(&available, &need, &allocation).unwrap(),
            seq(&[1, 0])
        );
    }

    #[test]
    fn earlier_release_is_visible_later_in_same_pass() {
        let available = ResourceVector::from([1]);
        let need = Matrix::from_rows([[1], [3]]).unwrap();
        let allocation = Matrix::from_rows([[2], [0]]).unwrap();
        assert_eq!(
            check_safe(&available, &need, &allocation).unwrap(),
            seq(&[0, 1])
        );
    }

    #[test]
    fn empty_system_is_trivially_safe() {
        let verdict =
            check_safe(&ResourceVector::zeros(0), &Matrix::zeros(0, 0), &Matrix::zeros(0, 0))
                .unwrap();
        assert_eq!(verdict, seq(&[]));
    }

    #[test]
    fn zero_need_processes_finish_in_index_order() {
        let verdict = check_safe(
            &ResourceVector::zeros(2),
            &Matrix::zeros(3, 2),
            &Matrix::zeros(3, 2),
        )
        .unwrap();
        assert_eq!(verdict, seq(&[0, 1, 2]));
    }

    #[test]
    fn process_count_mismatch_is_contract_violation() {
        let err = check_safe(
            &classic_available(),
            &Matrix::zeros(5, 3),
            &Matrix::zeros(4, 3),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ContractViolation::ShapeMismatch {
                what: "allocation",
                dimension: Dimension::Processes,
                expected: 5,
                actual: 4
            }
        );
    }

    #[test]
    fn arity_mismatch_with_available_is_contract_violation() {
        let err = check_safe(
            &ResourceVector::from([1, 1]),
            &Matrix::zeros(2, 3),
            &Matrix::zeros(2, 3),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ContractViolation::ShapeMismatch {
                what: "need",
                dimension: Dimension::Resources,
                ..
            }
        ));
    }

    #[test]
    fn reclamation_overflow_is_contract_violation() {
        let err = check_safe(
            &ResourceVector::from([u32::MAX]),
            &Matrix::from_rows([[0]]).unwrap(),
            &Matrix::from_rows([[1]]).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, ContractViolation::ComponentOverflow { .. }));
    }

    #[test]
    fn negative_need_is_reported() {
        let max = Matrix::from_rows([[1, 1]]).unwrap();
        let alloc = Matrix::from_rows([[2, 0]]).unwrap();
        assert!(matches!(
            derive_need(&max, &alloc),
            Err(ContractViolation::NegativeNeed { .. })
        ));
    }

    #[test]
    fn checker_handle_matches_free_function() {
        let need = derive_need(&classic_max(), &classic_allocation()).unwrap();
        let via_handle = SafetyChecker::new()
            .check(&classic_available(), &need, &classic_allocation())
            .unwrap();
        let via_fn = check_safe(&classic_available(), &need, &classic_allocation()).unwrap();
        assert_eq!(via_handle, via_fn);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// (available, need, allocation) with P in 1..=5 and N in 1..=3.
        fn arb_snapshot() -> impl Strategy<Value = (ResourceVector, Matrix, Matrix)> {
            (1usize..=5, 1usize..=3).prop_flat_map(|(p, n)| {
                (
                    proptest::collection::vec(0u32..6, n),
                    proptest::collection::vec(0u32..6, p * n),
                    proptest::collection::vec(0u32..4, p * n),
                )
                    .prop_map(move |(avail, need, alloc)| {
                        (
                            ResourceVector::from(avail),
                            Matrix::from_rows(need.chunks(n)).unwrap(),
                            Matrix::from_rows(alloc.chunks(n)).unwrap(),
                        )
                    })
            })
        }

        /// Exhaustive search over all completion orders.
        fn exists_order(work: &[u32], need: &Matrix, alloc: &Matrix, done: &mut [bool]) -> bool {
            if done.iter().all(|&d| d) {
                return true;
            }
            for i in 0..done.len() {
                let p = ProcessId(i as u32);
                if done[i] || !fits(need.row(p).unwrap(), work) {
                    continue;
                }
                let next: Vec<u32> = work
                    .iter()
                    .zip(alloc.row(p).unwrap())
                    .map(|(w, a)| w + a)
                    .collect();
                done[i] = true;
                if exists_order(&next, need, alloc, done) {
                    return true;
                }
                done[i] = false;
            }
            false
        }

        proptest! {
            #[test]
            fn verdict_matches_exhaustive_search((avail, need, alloc) in arb_snapshot()) {
                let verdict = check_safe(&avail, &need, &alloc).unwrap();
                let mut done = vec![false; need.process_count()];
                let expected = exists_order(avail.as_slice(), &need, &alloc, &mut done);
                prop_assert_eq!(verdict.is_safe(), expected);
            }

            #[test]
            fn check_is_deterministic((avail, need, alloc) in arb_snapshot()) {
                let first = check_safe(&avail, &need, &alloc).unwrap();
                let second = check_safe(&avail, &need, &alloc).unwrap();
                prop_assert_eq!(first, second);
            }

            #[test]
            fn safe_sequence_is_a_valid_completion_order((avail, need, alloc) in arb_snapshot()) {
                if let SafetyResult::Safe(order) = check_safe(&avail, &need, &alloc).unwrap() {
                    prop_assert!(order.is_permutation_of(need.process_count()));
                    let mut work = avail.clone();
                    for &p in order.as_slice() {
                        prop_assert!(fits(need.row(p).unwrap(), work.as_slice()));
                        work.checked_add_assign(alloc.row(p).unwrap()).unwrap();
                    }
                }
            }
        }
    }
}
