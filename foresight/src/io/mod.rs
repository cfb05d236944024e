//! I/O helpers for foresight commands.

pub mod config;
