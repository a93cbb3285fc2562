//! Benchmark profiles for the banker safety checker and request arbiter.
//!
//! - [`classic_profile`]: the five-process, three-resource textbook state
//! - [`chain_profile`]: a safe state the ascending scan can only unwind
//!   one process per pass, which hits the quadratic pass bound

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use banker_arbiter::SystemState;
use banker_core::{Matrix, ResourceVector};

/// The classic textbook state: Available `[3, 3, 2]`, five processes.
pub fn classic_profile() -> SystemState {
    SystemState::new(
        ResourceVector::from([3, 3, 2]),
        Matrix::from_rows([[7, 5, 3], [3, 2, 2], [9, 0, 2], [2, 2, 2], [4, 3, 3]]).unwrap(),
        Matrix::from_rows([[0, 1, 0], [2, 0, 0], [3, 0, 2], [2, 1, 1], [0, 0, 2]]).unwrap(),
    )
    .unwrap()
}

/// Worst-case ordering: `processes` processes over `resources` classes.
///
/// Every process holds one unit of each class and process `i` still needs
/// `processes - i` of each. With one unit of each class free, only the
/// last unfinished process fits on any pass, so the check runs
/// `processes` passes and finds the reverse order.
pub fn chain_profile(processes: usize, resources: usize) -> SystemState {
    let p = processes as u32;
    let max = (0..p).map(|i| vec![p - i + 1; resources]);
    let alloc = (0..p).map(|_| vec![1; resources]);
    SystemState::new(
        ResourceVector::from(vec![1; resources]),
        Matrix::from_rows(max).unwrap(),
        Matrix::from_rows(alloc).unwrap(),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use banker_core::ProcessId;

    #[test]
    fn chain_profile_unwinds_in_reverse() {
        let s = chain_profile(6, 2);
        assert_eq!(s.need_of(ProcessId(5)).unwrap().as_slice(), &[1, 1]);
        assert_eq!(s.need_of(ProcessId(0)).unwrap().as_slice(), &[6, 6]);
    }
}
