//! SQLite implementation of the game store.

mod context;
mod inventory;
mod items;
mod monsters;
mod players;
mod rows;
mod schema;
mod seed;

pub use context::SqliteGameContext;
pub use inventory::SqliteInventoryRepo;
pub use items::SqliteItemRepo;
pub use monsters::SqliteMonsterRepo;
pub use players::SqlitePlayerRepo;
pub use seed::{SeedData, SeedHolding, SeedItem, SeedMonster, SeedPlayer};
