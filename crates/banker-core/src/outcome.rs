//! Results of safety checks and resource requests.

use std::fmt;

use crate::id::ProcessId;

/// One completion order under which every process can obtain its full
/// remaining need.
///
/// On a successful safety check each process index `0..P` appears
/// exactly once. Safe sequences are not unique; the checker returns the
/// first one found by its ascending-index scan, so identical inputs
/// always produce the identical sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SafeSequence(Vec<ProcessId>);

impl SafeSequence {
    /// Wrap an explicit ordering.
    pub fn new(order: Vec<ProcessId>) -> Self {
        Self(order)
    }

    /// The ordering as a slice.
    pub fn as_slice(&self) -> &[ProcessId] {
        &self.0
    }

    /// Number of processes in the ordering.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the ordering is empty (only for a zero-process system).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if every id in `0..process_count` appears exactly once.
    pub fn is_permutation_of(&self, process_count: usize) -> bool {
        if self.0.len() != process_count {
            return false;
        }
        let mut seen = vec![false; process_count];
        for p in &self.0 {
            match seen.get_mut(p.index()) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }

    /// Consume into the underlying ordering.
    pub fn into_inner(self) -> Vec<ProcessId> {
        self.0
    }
}

impl fmt::Display for SafeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, p) in self.0.iter().enumerate() {
            if k > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{p}")?;
        }
        Ok(())
    }
}

impl IntoIterator for SafeSequence {
    type Item = ProcessId;
    type IntoIter = std::vec::IntoIter<ProcessId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SafeSequence {
    type Item = &'a ProcessId;
    type IntoIter = std::slice::Iter<'a, ProcessId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<u32>> for SafeSequence {
    fn from(v: Vec<u32>) -> Self {
        Self(v.into_iter().map(ProcessId).collect())
    }
}

/// Verdict of a safety check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SafetyResult {
    /// A completion order exists; here is the first one found.
    Safe(SafeSequence),
    /// No completion order exists.
    Unsafe,
}

impl SafetyResult {
    /// Returns `true` for [`SafetyResult::Safe`].
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Safe(_))
    }

    /// The safe sequence, if any.
    pub fn sequence(&self) -> Option<&SafeSequence> {
        match self {
            Self::Safe(seq) => Some(seq),
            Self::Unsafe => None,
        }
    }
}

/// Why a well-formed request was not granted.
///
/// Denials are expected business outcomes. State is unchanged after any
/// of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DenialReason {
    /// The request exceeds the process's declared remaining need.
    ExceedsMaxClaim,
    /// The request exceeds the units currently available.
    InsufficientResources,
    /// Granting would leave no guaranteed completion order; the
    /// speculative allocation was rolled back.
    UnsafeResultingState,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExceedsMaxClaim => write!(f, "request exceeds declared maximum claim"),
            Self::InsufficientResources => write!(f, "insufficient available resources"),
            Self::UnsafeResultingState => write!(f, "grant would leave the system unsafe"),
        }
    }
}

/// Outcome of a resource request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The request was committed; the resulting state is safe under this
    /// completion order.
    Granted(SafeSequence),
    /// The request was refused and state is exactly as before the call.
    Denied(DenialReason),
}

impl RequestOutcome {
    /// Returns `true` for [`RequestOutcome::Granted`].
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }

    /// The denial reason, if denied.
    pub fn denial(&self) -> Option<DenialReason> {
        match self {
            Self::Granted(_) => None,
            Self::Denied(reason) => Some(*reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permutation_check() {
        assert!(SafeSequence::from(vec![1, 3, 4, 0, 2]).is_permutation_of(5));
        assert!(!SafeSequence::from(vec![1, 3, 4, 0]).is_permutation_of(5));
        assert!(!SafeSequence::from(vec![1, 1, 4, 0, 2]).is_permutation_of(5));
        assert!(!SafeSequence::from(vec![1, 3, 5, 0, 2]).is_permutation_of(5));
        assert!(SafeSequence::default().is_permutation_of(0));
    }

    #[test]
    fn sequence_display() {
        assert_eq!(
            SafeSequence::from(vec![1, 3, 4]).to_string(),
            "P1 -> P3 -> P4"
        );
    }

    #[test]
    fn outcome_accessors() {
        let granted = RequestOutcome::Granted(SafeSequence::from(vec![0]));
        assert!(granted.is_granted());
        assert_eq!(granted.denial(), None);

        let denied = RequestOutcome::Denied(DenialReason::InsufficientResources);
        assert!(!denied.is_granted());
        assert_eq!(denied.denial(), Some(DenialReason::InsufficientResources));

        assert!(!SafetyResult::Unsafe.is_safe());
        assert_eq!(SafetyResult::Unsafe.sequence(), None);
    }
}
