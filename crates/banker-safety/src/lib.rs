//! Safe-state detection for Banker's-algorithm resource accounting.
//!
//! [`check_safe`] decides whether a snapshot of `Available`, `Need` and
//! `Allocation` admits an ordering in which every process can obtain its
//! full remaining need and then release everything it holds. It borrows
//! its inputs read-only and keeps no state between calls, so it may run
//! against any immutable snapshot without locking.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod checker;

pub use checker::{check_safe, derive_need, SafetyChecker};
