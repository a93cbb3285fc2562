//! Banker: deadlock avoidance through the Banker's algorithm.
//!
//! This is the facade crate that re-exports the public API of the banker
//! sub-crates. Most users only need this one dependency.
//!
//! # Quick start
//!
//! ```rust
//! use banker::prelude::*;
//!
//! let config = SystemConfig {
//!     resources: [("A", 3), ("B", 3), ("C", 2)]
//!         .into_iter()
//!         .map(|(name, units)| (name.to_string(), units))
//!         .collect(),
//!     processes: vec![
//!         ProcessDecl::new("P0", [7, 5, 3], [0, 1, 0]),
//!         ProcessDecl::new("P1", [3, 2, 2], [2, 0, 0]),
//!         ProcessDecl::new("P2", [9, 0, 2], [3, 0, 2]),
//!         ProcessDecl::new("P3", [2, 2, 2], [2, 1, 1]),
//!         ProcessDecl::new("P4", [4, 3, 3], [0, 0, 2]),
//!     ],
//!     ..SystemConfig::default()
//! };
//! let mut arbiter = RequestArbiter::new(config).unwrap();
//!
//! // Granting this would leave no process able to finish.
//! let p0 = arbiter.process_id("P0").unwrap();
//! assert_eq!(
//!     arbiter.request(p0, &ResourceVector::from([2, 3, 0])).unwrap(),
//!     RequestOutcome::Denied(DenialReason::UnsafeResultingState)
//! );
//!
//! let p1 = arbiter.process_id("P1").unwrap();
//! let outcome = arbiter.request(p1, &ResourceVector::from([1, 0, 2])).unwrap();
//! assert!(outcome.is_granted());
//! assert_eq!(arbiter.state().available().as_slice(), &[2, 3, 0]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `banker-core` | Ids, vectors, matrices, outcomes, errors |
//! | [`safety`] | `banker-safety` | The safety check and need derivation |
//! | [`arbiter`] | `banker-arbiter` | Request arbitration, configuration, shared handle |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core value types (`banker-core`).
///
/// [`types::ResourceVector`], [`types::Matrix`], the outcome enums and
/// [`types::ContractViolation`].
pub use banker_core as types;

/// The safety check (`banker-safety`).
///
/// [`safety::check_safe`] is a pure function over borrowed tables.
pub use banker_safety as safety;

/// Request arbitration (`banker-arbiter`).
///
/// [`arbiter::RequestArbiter`] for single-owner use,
/// [`arbiter::SharedArbiter`] for multi-threaded hosts.
pub use banker_arbiter as arbiter;

/// Common imports for typical usage.
///
/// ```rust
/// use banker::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use banker_core::{
        DenialReason, Matrix, ProcessId, RequestOutcome, ResourceId, ResourceVector,
        SafeSequence, SafetyResult,
    };

    // Errors
    pub use banker_core::ContractViolation;
    pub use banker_arbiter::ConfigError;

    // Safety
    pub use banker_safety::{check_safe, SafetyChecker};

    // Arbiter
    pub use banker_arbiter::{
        ArbiterMetrics, ProcessDecl, RequestArbiter, SharedArbiter, SystemConfig, SystemState,
    };
}
