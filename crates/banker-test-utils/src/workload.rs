//! Seeded random systems and operation streams.
//!
//! Everything is driven by a `ChaCha8Rng`, so a seed reproduces both the
//! initial tables and the full operation stream.

use banker_arbiter::SystemState;
use banker_core::{Matrix, ProcessId, ResourceVector};
use banker_safety::check_safe;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Shape of the generated systems. Both dimensions must be non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkloadProfile {
    pub processes: usize,
    pub resources: usize,
    /// Upper bound on any single `max_demand` component.
    pub max_units: u32,
    /// Percentage of requests that deliberately overshoot remaining need.
    pub overshoot_pct: u32,
}

impl WorkloadProfile {
    pub const SMALL: Self = Self {
        processes: 5,
        resources: 3,
        max_units: 10,
        overshoot_pct: 10,
    };

    pub const LARGE: Self = Self {
        processes: 64,
        resources: 8,
        max_units: 100,
        overshoot_pct: 5,
    };
}

impl Default for WorkloadProfile {
    fn default() -> Self {
        Self::SMALL
    }
}

/// One step of a generated stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Request(ProcessId, ResourceVector),
    Release(ProcessId, ResourceVector),
    Complete(ProcessId),
}

/// Deterministic generator of systems and operations.
pub struct WorkloadGenerator {
    rng: ChaCha8Rng,
    profile: WorkloadProfile,
}

impl WorkloadGenerator {
    pub fn new(seed: u64, profile: WorkloadProfile) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            profile,
        }
    }

    pub fn profile(&self) -> WorkloadProfile {
        self.profile
    }

    /// A random system whose initial state is safe.
    ///
    /// Holdings are drawn below each maximum. If the drawn `Available`
    /// leaves the state unsafe it is raised to cover the largest
    /// remaining need per resource, which lets any process finish first.
    pub fn safe_state(&mut self) -> SystemState {
        let state = self.any_state();
        let need = state.need();
        let safe = check_safe(state.available(), &need, state.allocation())
            .map(|r| r.is_safe())
            .unwrap_or(false);
        if safe {
            return state;
        }
        let available: ResourceVector = (0..self.profile.resources)
            .map(|r| {
                let widest = need.rows().map(|row| row[r]).max().unwrap_or(0);
                state.available().as_slice()[r].max(widest)
            })
            .collect();
        SystemState::new(available, state.max_demand().clone(), state.allocation().clone())
            .expect("generated tables are well-formed")
    }

    /// A random well-formed system, safe or not.
    pub fn any_state(&mut self) -> SystemState {
        let WorkloadProfile {
            processes,
            resources,
            max_units,
            ..
        } = self.profile;
        let mut max_rows = Vec::with_capacity(processes);
        let mut alloc_rows = Vec::with_capacity(processes);
        for _ in 0..processes {
            let max: Vec<u32> = (0..resources)
                .map(|_| self.rng.random_range(0..=max_units))
                .collect();
            let alloc: Vec<u32> = max.iter().map(|&m| self.rng.random_range(0..=m)).collect();
            max_rows.push(max);
            alloc_rows.push(alloc);
        }
        let available: ResourceVector = (0..resources)
            .map(|_| self.rng.random_range(0..=max_units))
            .collect();
        SystemState::new(
            available,
            Matrix::from_rows(max_rows).expect("rows share one width"),
            Matrix::from_rows(alloc_rows).expect("rows share one width"),
        )
        .expect("generated tables are well-formed")
    }

    /// Next operation against `state`.
    ///
    /// Roughly 70% requests, 20% partial releases, 10% completions.
    /// Requests stay within the remaining need except for the
    /// configured overshoot share. Releases never exceed holdings.
    pub fn next_op(&mut self, state: &SystemState) -> Op {
        let process = ProcessId(self.rng.random_range(0..state.process_count() as u32));
        let roll = self.rng.random_range(0..100u32);
        if roll < 70 {
            Op::Request(process, self.request_for(state, process))
        } else if roll < 90 {
            let held = state
                .allocation()
                .row(process)
                .expect("process drawn in range");
            let units = held
                .iter()
                .map(|&h| self.rng.random_range(0..=h))
                .collect();
            Op::Release(process, units)
        } else {
            Op::Complete(process)
        }
    }

    /// A stream of `len` operations, each drawn against `state` as it
    /// stands now. Useful when the consumer does not feed results back.
    pub fn ops(&mut self, state: &SystemState, len: usize) -> Vec<Op> {
        (0..len).map(|_| self.next_op(state)).collect()
    }

    fn request_for(&mut self, state: &SystemState, process: ProcessId) -> ResourceVector {
        let need = state.need_of(process).expect("process drawn in range");
        let overshoot = self.rng.random_range(0..100u32) < self.profile.overshoot_pct;
        let mut req: ResourceVector = need
            .iter()
            .map(|&n| self.rng.random_range(0..=n))
            .collect();
        if overshoot && !need.is_empty() {
            let r = self.rng.random_range(0..need.len());
            req = req
                .iter()
                .enumerate()
                .map(|(i, &v)| if i == r { need.as_slice()[i] + 1 } else { v })
                .collect();
        }
        req
    }
}
