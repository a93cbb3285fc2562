//! Core types for Banker's-algorithm resource accounting.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the safety checker and the request arbiter:
//! process and resource ids, fixed-arity resource vectors, fixed-shape
//! matrices, safety and request outcomes, and the contract-violation
//! error type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod matrix;
pub mod outcome;
pub mod vector;

pub use error::{ContractViolation, Dimension};
pub use id::{ProcessId, ResourceId};
pub use matrix::Matrix;
pub use outcome::{DenialReason, RequestOutcome, SafeSequence, SafetyResult};
pub use vector::ResourceVector;
