//! The classic five-process session, end to end.
//!
//! Demonstrates:
//!   1. Declaring resources and processes by name
//!   2. An unsafe request being denied and rolled back
//!   3. A safe request being granted
//!   4. Running every process to completion in a safe order
//!
//! Run with:
//!   RUST_LOG=debug cargo run -p banker-arbiter --example classic

use std::error::Error;

use banker_arbiter::{ProcessDecl, RequestArbiter, SystemConfig};
use banker_core::{RequestOutcome, ResourceVector};
use tracing_subscriber::EnvFilter;

// ─── Declarations ───────────────────────────────────────────────

const RESOURCES: [(&str, u32); 3] = [("A", 3), ("B", 3), ("C", 2)];

const PROCESSES: [(&str, [u32; 3], [u32; 3]); 5] = [
    ("P0", [7, 5, 3], [0, 1, 0]),
    ("P1", [3, 2, 2], [2, 0, 0]),
    ("P2", [9, 0, 2], [3, 0, 2]),
    ("P3", [2, 2, 2], [2, 1, 1]),
    ("P4", [4, 3, 3], [0, 0, 2]),
];

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = SystemConfig {
        resources: RESOURCES.iter().map(|&(n, u)| (n.to_string(), u)).collect(),
        processes: PROCESSES
            .iter()
            .map(|&(n, max, alloc)| ProcessDecl::new(n, max, alloc))
            .collect(),
        ..SystemConfig::default()
    };
    let mut arbiter = RequestArbiter::new(config)?;
    println!("available: {}", arbiter.state().available());
    println!("need:\n{}", arbiter.state().need());

    let script: [(&str, [u32; 3]); 2] = [("P0", [2, 3, 0]), ("P1", [1, 0, 2])];
    for (name, units) in script {
        let process = arbiter.process_id(name).ok_or("unknown process")?;
        match arbiter.request(process, &ResourceVector::from(units))? {
            RequestOutcome::Granted(seq) => println!("{name} {units:?}: granted, safe order {seq}"),
            RequestOutcome::Denied(reason) => println!("{name} {units:?}: denied ({reason})"),
        }
        println!("available: {}", arbiter.state().available());
    }

    let order = arbiter
        .check_safe()?
        .sequence()
        .cloned()
        .ok_or("state became unsafe")?;
    for process in &order {
        let need = arbiter.state().need_of(*process).ok_or("unknown process")?;
        arbiter.request(*process, &need)?;
        let returned = arbiter.complete(*process)?;
        println!(
            "{} finished, returned {returned}; available {}",
            arbiter.process_name(*process).unwrap_or("?"),
            arbiter.state().available()
        );
    }

    println!("{:#?}", arbiter.metrics());
    Ok(())
}
