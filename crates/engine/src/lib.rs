//! Delver engine library.
//!
//! ## Structure
//!
//! - `infrastructure/` - Ports, SQLite adapters, clock, configuration
//! - `game/` - Game operations over a borrowed data context
//! - `menu` - Interactive console menu
//! - `app` - Application composition

pub mod app;
pub mod game;
pub mod infrastructure;
pub mod menu;
