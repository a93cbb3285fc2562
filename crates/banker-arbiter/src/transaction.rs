//! Scoped speculative grant with rollback on drop.
//!
//! [`Speculation`] is the only way the request path mutates a
//! [`SystemState`]. Applying a grant saves the mutable tables first; unless
//! [`commit()`](Speculation::commit) is called, dropping the guard puts
//! them back exactly. Every early return between apply and commit
//! (an unsafe verdict, a `?` on a contract violation, a panic unwinding
//! through the caller) therefore rolls back.

use banker_core::{ContractViolation, ProcessId, ResourceVector};

use crate::state::{Saved, SystemState};

/// A grant applied to a [`SystemState`] but not yet committed.
pub(crate) struct Speculation<'s> {
    state: &'s mut SystemState,
    saved: Option<Saved>,
}

impl<'s> Speculation<'s> {
    /// Save the tables, then apply `req` to `process`.
    ///
    /// If applying fails nothing was mutated and no guard is returned.
    pub(crate) fn begin(
        state: &'s mut SystemState,
        process: ProcessId,
        req: &ResourceVector,
    ) -> Result<Self, ContractViolation> {
        let saved = state.save();
        state.apply_grant(process, req)?;
        Ok(Self {
            state,
            saved: Some(saved),
        })
    }

    /// The speculative state.
    pub(crate) fn state(&self) -> &SystemState {
        &*self.state
    }

    /// Keep the mutation.
    pub(crate) fn commit(mut self) {
        self.saved = None;
    }
}

impl Drop for Speculation<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.state.restore(saved);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banker_core::Matrix;

    fn state() -> SystemState {
        SystemState::new(
            ResourceVector::from([4, 4]),
            Matrix::from_rows([[3, 3], [4, 4]]).unwrap(),
            Matrix::from_rows([[1, 0], [0, 1]]).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn drop_without_commit_rolls_back() {
        let mut s = state();
        let before = s.clone();
        {
            let guard = Speculation::begin(&mut s, ProcessId(0), &ResourceVector::from([2, 3]))
                .unwrap();
            assert_eq!(guard.state().available().as_slice(), &[2, 1]);
        }
        assert_eq!(s, before);
    }

    #[test]
    fn commit_keeps_mutation() {
        let mut s = state();
        let guard =
            Speculation::begin(&mut s, ProcessId(1), &ResourceVector::from([1, 1])).unwrap();
        guard.commit();
        assert_eq!(s.available().as_slice(), &[3, 3]);
        assert_eq!(s.allocation().row(ProcessId(1)), Some(&[1, 2][..]));
    }

    #[test]
    fn early_return_rolls_back() {
        fn fails_midway(s: &mut SystemState) -> Result<(), ContractViolation> {
            let _guard = Speculation::begin(s, ProcessId(0), &ResourceVector::from([1, 1]))?;
            Err(ContractViolation::Poisoned)
        }
        let mut s = state();
        let before = s.clone();
        assert_eq!(fails_midway(&mut s), Err(ContractViolation::Poisoned));
        assert_eq!(s, before);
    }

    #[test]
    fn failed_begin_mutates_nothing() {
        let mut s = state();
        let before = s.clone();
        assert!(Speculation::begin(&mut s, ProcessId(0), &ResourceVector::from([5, 0])).is_err());
        assert_eq!(s, before);
    }
}
