//! Delver domain: entities, value objects, and game rules.
//!
//! No I/O lives here. Persistence and randomness are supplied by the engine.

pub mod combat;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use combat::{BattleLog, BattleOutcome, Combatant};
pub use entities::{
    level_for, InventoryEntry, Item, ItemKind, Monster, Player, EXPERIENCE_PER_LEVEL,
    HEALTH_PER_LEVEL, STARTING_GOLD, STARTING_HEALTH,
};
pub use error::DomainError;
pub use ids::{ItemId, MonsterId, PlayerId};
pub use value_objects::{PlayerName, MAX_PLAYER_NAME_LENGTH};
