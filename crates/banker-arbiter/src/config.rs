//! System configuration, validation, and error types.
//!
//! [`SystemConfig`] is the builder-input for a
//! [`RequestArbiter`](crate::RequestArbiter). [`validate()`](SystemConfig::validate)
//! checks structural invariants at startup; the arbiter constructor then
//! turns the declarations into a [`SystemState`].

use std::error::Error;
use std::fmt;

use banker_core::{ContractViolation, Matrix, ProcessId, ResourceId, ResourceVector};
use indexmap::{IndexMap, IndexSet};

use crate::state::SystemState;

// ── ProcessDecl ────────────────────────────────────────────────────

/// Declaration of one competing process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessDecl {
    /// Unique name, used in diagnostics and look-ups.
    pub name: String,
    /// Upper bound on what this process will ever hold at once.
    pub max_demand: ResourceVector,
    /// Units already held at startup.
    pub allocation: ResourceVector,
}

impl ProcessDecl {
    /// Declare a process.
    pub fn new(
        name: impl Into<String>,
        max_demand: impl Into<ResourceVector>,
        allocation: impl Into<ResourceVector>,
    ) -> Self {
        Self {
            name: name.into(),
            max_demand: max_demand.into(),
            allocation: allocation.into(),
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SystemConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// No resource classes declared.
    NoResources,
    /// No processes declared.
    NoProcesses,
    /// Two processes share a name.
    DuplicateProcess {
        /// The repeated name.
        name: String,
    },
    /// A process's `max_demand` has the wrong number of components.
    DemandArity {
        /// The offending process.
        process: String,
        /// Number of declared resource classes.
        expected: usize,
        /// Components supplied.
        actual: usize,
    },
    /// A process's `allocation` has the wrong number of components.
    AllocationArity {
        /// The offending process.
        process: String,
        /// Number of declared resource classes.
        expected: usize,
        /// Components supplied.
        actual: usize,
    },
    /// A process starts out holding more than its declared maximum.
    AllocationExceedsDemand {
        /// The offending process.
        process: String,
        /// The first resource class over its maximum.
        resource: String,
    },
    /// The assembled tables were rejected.
    State(ContractViolation),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResources => write!(f, "no resource classes declared"),
            Self::NoProcesses => write!(f, "no processes declared"),
            Self::DuplicateProcess { name } => write!(f, "duplicate process name '{name}'"),
            Self::DemandArity {
                process,
                expected,
                actual,
            } => write!(
                f,
                "process '{process}' max_demand has {actual} components, expected {expected}"
            ),
            Self::AllocationArity {
                process,
                expected,
                actual,
            } => write!(
                f,
                "process '{process}' allocation has {actual} components, expected {expected}"
            ),
            Self::AllocationExceedsDemand { process, resource } => write!(
                f,
                "process '{process}' starts with more '{resource}' than its max demand"
            ),
            Self::State(e) => write!(f, "state: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::State(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ContractViolation> for ConfigError {
    fn from(e: ContractViolation) -> Self {
        Self::State(e)
    }
}

// ── SystemConfig ───────────────────────────────────────────────────

/// Complete configuration for constructing an arbiter.
///
/// Resource classes are keyed by name; their insertion order defines
/// [`ResourceId`] order and every vector in `processes` is laid out in
/// that order. `processes[n]` becomes [`ProcessId`]`(n)`.
///
/// The initial state need not be safe. An unsafe start only means every
/// request is denied as unsafe until releases restore safety.
#[derive(Clone, Debug)]
pub struct SystemConfig {
    /// Resource class name to initially available units.
    pub resources: IndexMap<String, u32>,
    /// Competing processes, in id order.
    pub processes: Vec<ProcessDecl>,
    /// Log business denials at `info` (otherwise `debug`). Default: true.
    pub log_denials: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            resources: IndexMap::new(),
            processes: Vec::new(),
            log_denials: true,
        }
    }
}

impl SystemConfig {
    /// Validate all structural invariants.
    ///
    /// Checks, in order: at least one resource class, at least one
    /// process, unique process names, per-process arity, and
    /// `allocation <= max_demand`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Must have at least one resource class.
        if self.resources.is_empty() {
            return Err(ConfigError::NoResources);
        }
        // 2. Must have at least one process.
        if self.processes.is_empty() {
            return Err(ConfigError::NoProcesses);
        }
        // 3. Process names are unique.
        let mut names = IndexSet::with_capacity(self.processes.len());
        for decl in &self.processes {
            if !names.insert(decl.name.as_str()) {
                return Err(ConfigError::DuplicateProcess {
                    name: decl.name.clone(),
                });
            }
        }
        // 4. Per-process arity and initial holdings.
        let n = self.resources.len();
        for decl in &self.processes {
            if decl.max_demand.len() != n {
                return Err(ConfigError::DemandArity {
                    process: decl.name.clone(),
                    expected: n,
                    actual: decl.max_demand.len(),
                });
            }
            if decl.allocation.len() != n {
                return Err(ConfigError::AllocationArity {
                    process: decl.name.clone(),
                    expected: n,
                    actual: decl.allocation.len(),
                });
            }
            if let Some(r) = decl.allocation.first_exceeding(decl.max_demand.as_slice()) {
                let resource = self
                    .resources
                    .get_index(r.index())
                    .map(|(name, _)| name.clone())
                    .unwrap_or_else(|| r.to_string());
                return Err(ConfigError::AllocationExceedsDemand {
                    process: decl.name.clone(),
                    resource,
                });
            }
        }
        Ok(())
    }

    /// Validate, then assemble the accounting tables.
    pub fn build_state(&self) -> Result<SystemState, ConfigError> {
        self.validate()?;
        let available: ResourceVector = self.resources.values().copied().collect();
        let max_demand = Matrix::from_rows(self.processes.iter().map(|p| &p.max_demand))?;
        let allocation = Matrix::from_rows(self.processes.iter().map(|p| &p.allocation))?;
        Ok(SystemState::new(available, max_demand, allocation)?)
    }

    /// Id of the resource class called `name`.
    pub fn resource_id(&self, name: &str) -> Option<ResourceId> {
        self.resources
            .get_index_of(name)
            .map(|i| ResourceId(i as u32))
    }

    /// Id of the process called `name`.
    pub fn process_id(&self, name: &str) -> Option<ProcessId> {
        self.processes
            .iter()
            .position(|p| p.name == name)
            .map(|i| ProcessId(i as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> SystemConfig {
        SystemConfig {
            resources: [("cpu".to_string(), 2), ("disk".to_string(), 1)]
                .into_iter()
                .collect(),
            processes: vec![
                ProcessDecl::new("render", [2, 1], [0, 0]),
                ProcessDecl::new("index", [1, 1], [1, 0]),
            ],
            log_denials: true,
        }
    }

    #[test]
    fn valid_config_builds_state() {
        let state = two_by_two().build_state().unwrap();
        assert_eq!(state.available().as_slice(), &[2, 1]);
        assert_eq!(state.process_count(), 2);
        assert_eq!(state.allocation().row(ProcessId(1)), Some(&[1, 0][..]));
    }

    #[test]
    fn empty_config_is_rejected() {
        assert_eq!(
            SystemConfig::default().validate(),
            Err(ConfigError::NoResources)
        );
        let mut cfg = two_by_two();
        cfg.processes.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::NoProcesses));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut cfg = two_by_two();
        cfg.processes.push(ProcessDecl::new("render", [0, 0], [0, 0]));
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DuplicateProcess {
                name: "render".into()
            })
        );
    }

    #[test]
    fn arity_errors_name_the_process() {
        let mut cfg = two_by_two();
        cfg.processes[1].max_demand = ResourceVector::from([1, 1, 1]);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DemandArity {
                process: "index".into(),
                expected: 2,
                actual: 3
            })
        );

        let mut cfg = two_by_two();
        cfg.processes[0].allocation = ResourceVector::from([0]);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::AllocationArity { .. })
        ));
    }

    #[test]
    fn over_allocation_names_the_resource() {
        let mut cfg = two_by_two();
        cfg.processes[1].allocation = ResourceVector::from([1, 2]);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::AllocationExceedsDemand {
                process: "index".into(),
                resource: "disk".into()
            })
        );
    }

    #[test]
    fn name_lookups() {
        let cfg = two_by_two();
        assert_eq!(cfg.resource_id("disk"), Some(ResourceId(1)));
        assert_eq!(cfg.resource_id("gpu"), None);
        assert_eq!(cfg.process_id("index"), Some(ProcessId(1)));
        assert_eq!(cfg.process_id("nope"), None);
    }

    #[test]
    fn state_error_chains_source() {
        let e = ConfigError::from(ContractViolation::Poisoned);
        assert!(e.source().is_some());
        assert_eq!(e.to_string(), "state: arbiter lock poisoned");
    }
}
