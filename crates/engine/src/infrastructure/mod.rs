//! Infrastructure implementations.
//!
//! Port traits and their adapters: SQLite storage, system clock and random.

pub mod clock;
pub mod config;
pub mod ports;
pub mod sqlite;
