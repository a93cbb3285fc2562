//! Test fixtures and workload generators for banker development.
//!
//! [`fixtures`] holds the classic five-process, three-resource instance
//! used throughout the test suites. [`workload`] generates seeded random
//! systems and operation streams for property tests and benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod workload;

pub use fixtures::{classic_arbiter, classic_config, classic_state};
pub use workload::{Op, WorkloadGenerator, WorkloadProfile};
