//! The classic textbook instance.
//!
//! Five processes `P0..P4` over three resource classes `A, B, C` with
//! totals `[10, 5, 7]`. The initial state is safe with sequence
//! `P1 -> P3 -> P4 -> P0 -> P2`.

use banker_arbiter::{ProcessDecl, RequestArbiter, SystemConfig, SystemState};
use banker_core::{Matrix, ResourceVector};

pub const CLASSIC_RESOURCES: [&str; 3] = ["A", "B", "C"];
pub const CLASSIC_TOTAL: [u32; 3] = [10, 5, 7];
pub const CLASSIC_AVAILABLE: [u32; 3] = [3, 3, 2];

pub const CLASSIC_MAX: [[u32; 3]; 5] = [[7, 5, 3], [3, 2, 2], [9, 0, 2], [2, 2, 2], [4, 3, 3]];

pub const CLASSIC_ALLOCATION: [[u32; 3]; 5] =
    [[0, 1, 0], [2, 0, 0], [3, 0, 2], [2, 1, 1], [0, 0, 2]];

pub const CLASSIC_NEED: [[u32; 3]; 5] = [[7, 4, 3], [1, 2, 2], [6, 0, 0], [0, 1, 1], [4, 3, 1]];

/// Safe sequence the ascending-index scan finds for the initial state.
pub const CLASSIC_SAFE_SEQUENCE: [u32; 5] = [1, 3, 4, 0, 2];

/// Accounting tables of the classic instance.
pub fn classic_state() -> SystemState {
    // Safety: the constants above satisfy every SystemState invariant.
    SystemState::new(
        ResourceVector::from(CLASSIC_AVAILABLE),
        Matrix::from_rows(CLASSIC_MAX).expect("classic max is rectangular"),
        Matrix::from_rows(CLASSIC_ALLOCATION).expect("classic allocation is rectangular"),
    )
    .expect("classic instance is well-formed")
}

/// Named configuration of the classic instance (`P0..P4`, `A, B, C`).
pub fn classic_config() -> SystemConfig {
    SystemConfig {
        resources: CLASSIC_RESOURCES
            .iter()
            .zip(CLASSIC_AVAILABLE)
            .map(|(name, units)| (name.to_string(), units))
            .collect(),
        processes: CLASSIC_MAX
            .iter()
            .zip(CLASSIC_ALLOCATION)
            .enumerate()
            .map(|(i, (max, alloc))| ProcessDecl::new(format!("P{i}"), *max, alloc))
            .collect(),
        ..SystemConfig::default()
    }
}

/// A fresh arbiter over [`classic_config`].
pub fn classic_arbiter() -> RequestArbiter {
    RequestArbiter::new(classic_config()).expect("classic config is valid")
}
