//! Strongly-typed identifiers for processes and resource classes.

use std::fmt;

/// Identifies a process (row) in the accounting tables.
///
/// `ProcessId(n)` corresponds to the n-th row of the `Allocation` and
/// `MaxDemand` matrices. Valid ids are `0..process_count`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(pub u32);

impl ProcessId {
    /// The row index this id addresses.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl From<u32> for ProcessId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a resource class (column) in the accounting tables.
///
/// `ResourceId(n)` corresponds to the n-th component of every
/// [`ResourceVector`](crate::ResourceVector).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub u32);

impl ResourceId {
    /// The column index this id addresses.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

impl From<u32> for ResourceId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes() {
        assert_eq!(ProcessId(3).to_string(), "P3");
        assert_eq!(ResourceId(0).to_string(), "R0");
    }

    #[test]
    fn index_round_trips_through_u32() {
        assert_eq!(ProcessId::from(7).index(), 7);
        assert_eq!(ResourceId::from(2).index(), 2);
    }
}
