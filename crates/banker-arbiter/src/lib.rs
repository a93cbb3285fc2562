//! Grant-or-deny request arbitration over Banker's-algorithm accounting
//! tables.
//!
//! [`RequestArbiter`] owns a [`SystemState`] and decides each incoming
//! request by speculatively applying it and asking the safety checker
//! whether the result is still safe. Unsafe grants are rolled back to the
//! exact pre-request tables. [`SharedArbiter`] serializes the same
//! operations behind one mutex for multi-threaded hosts.
//!
//! Business denials are [`RequestOutcome::Denied`](banker_core::RequestOutcome)
//! values; only API misuse surfaces as an error.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arbiter;
pub mod config;
pub mod metrics;
pub mod shared;
pub mod state;
mod transaction;

pub use arbiter::{request, RequestArbiter};
pub use config::{ConfigError, ProcessDecl, SystemConfig};
pub use metrics::ArbiterMetrics;
pub use shared::SharedArbiter;
pub use state::SystemState;
