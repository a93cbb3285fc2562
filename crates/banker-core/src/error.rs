//! Error types for the Banker's-algorithm accounting core.
//!
//! Only API misuse is an error. The three business denials
//! (exceeds max claim, insufficient resources, unsafe resulting state)
//! are ordinary values, see [`DenialReason`](crate::DenialReason).

use std::error::Error;
use std::fmt;

use crate::id::{ProcessId, ResourceId};

/// A dimension of the process-by-resource tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dimension {
    /// Number of processes (rows).
    Processes,
    /// Number of resource classes (columns / vector arity).
    Resources,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Processes => write!(f, "process count"),
            Self::Resources => write!(f, "resource count"),
        }
    }
}

/// A caller broke the contract of a core operation.
///
/// Contract violations are never recovered internally and never leave a
/// partial mutation behind: every operation that can return one checks
/// before it mutates, or undoes its own work before returning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContractViolation {
    /// Two inputs disagree on the process count or resource arity.
    ShapeMismatch {
        /// Which input disagreed.
        what: &'static str,
        /// Which of its dimensions disagreed.
        dimension: Dimension,
        /// The size implied by the reference input.
        expected: usize,
        /// The size actually supplied.
        actual: usize,
    },
    /// A matrix was built from rows of differing length.
    RaggedMatrix {
        /// Index of the first offending row.
        row: usize,
        /// Length of row 0.
        expected: usize,
        /// Length of the offending row.
        actual: usize,
    },
    /// A process id does not name a row of the accounting tables.
    ProcessOutOfRange {
        /// The offending id.
        process: ProcessId,
        /// Number of processes in the system.
        process_count: usize,
    },
    /// A request or release vector has the wrong number of components.
    ArityMismatch {
        /// Number of resource classes in the system.
        expected: usize,
        /// Number of components supplied.
        actual: usize,
    },
    /// `MaxDemand - Allocation` would be negative: a process holds more
    /// than it ever declared.
    NegativeNeed {
        /// The process whose need underflowed.
        process: ProcessId,
        /// The first resource class that underflowed.
        resource: ResourceId,
    },
    /// A component would leave the `u32` range.
    ComponentOverflow {
        /// The resource class that overflowed or underflowed.
        resource: ResourceId,
    },
    /// A process tried to give back more than it currently holds.
    ReleaseExceedsAllocation {
        /// The releasing process.
        process: ProcessId,
        /// The first resource class over-released.
        resource: ResourceId,
    },
    /// The lock guarding a shared arbiter was poisoned by a panic.
    Poisoned,
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                what,
                dimension,
                expected,
                actual,
            } => write!(
                f,
                "{what} {dimension} is {actual}, expected {expected}"
            ),
            Self::RaggedMatrix {
                row,
                expected,
                actual,
            } => write!(
                f,
                "ragged matrix: row {row} has {actual} columns, expected {expected}"
            ),
            Self::ProcessOutOfRange {
                process,
                process_count,
            } => write!(
                f,
                "process {process} out of range (system has {process_count} processes)"
            ),
            Self::ArityMismatch { expected, actual } => write!(
                f,
                "vector has {actual} components, system has {expected} resource classes"
            ),
            Self::NegativeNeed { process, resource } => write!(
                f,
                "allocation of {process} exceeds its max demand for {resource}"
            ),
            Self::ComponentOverflow { resource } => {
                write!(f, "component {resource} out of u32 range")
            }
            Self::ReleaseExceedsAllocation { process, resource } => write!(
                f,
                "{process} released more {resource} than it holds"
            ),
            Self::Poisoned => write!(f, "arbiter lock poisoned"),
        }
    }
}

impl Error for ContractViolation {}
