//! Domain entities - Core game objects with identity

mod item;
mod monster;
mod player;

pub use item::{InventoryEntry, Item, ItemKind};
pub use monster::Monster;
pub use player::{
    level_for, Player, EXPERIENCE_PER_LEVEL, HEALTH_PER_LEVEL, STARTING_GOLD, STARTING_HEALTH,
};
