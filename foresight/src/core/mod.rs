//! Deterministic, pure logic for the delivery agent.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! worlds and return deterministic outputs suitable for tests; the only
//! source of randomness is the explicitly seeded world generator.

pub mod annotate;
pub mod budget;
pub mod generate;
pub mod grid;
pub mod invariants;
pub mod pathfinding;
pub mod planner;
pub mod scoring;
pub mod strategy;
pub mod types;
pub mod world;
