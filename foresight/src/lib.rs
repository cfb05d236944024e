//! Grid delivery agent with depth-bounded foresight planning.
//!
//! An agent on a 4-connected grid collects items from pickup cells and brings
//! them to delivery cells while managing a battery. Strategies choose which
//! targets to visit next; the execution loop walks the agent there along
//! shortest paths. The architecture keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (pathfinding, scoring, planning,
//!   world generation). No I/O, fully testable in isolation.
//! - **[`io`]**: Configuration on disk.
//!
//! Orchestration modules ([`looping`], [`run`], [`select`]) coordinate core
//! logic with configuration to implement CLI commands.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod looping;
pub mod run;
pub mod select;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
