use delver_domain::{DomainError, ItemId, MonsterId, PlayerId};

use crate::infrastructure::ports::RepoError;

/// Errors from game operations.
///
/// All of these are recoverable from the menu's point of view: it reports
/// them and keeps running.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Monster not found: {0}")]
    MonsterNotFound(MonsterId),

    #[error("{player} is not carrying {item}")]
    ItemNotInInventory { player: String, item: String },

    #[error("{0} cannot be equipped")]
    NotEquippable(String),

    #[error("{0} cannot be used")]
    NotConsumable(String),

    #[error("{0} is too wounded to fight. Rest or use a potion first")]
    PlayerDefeated(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Storage error: {0}")]
    Repo(#[from] RepoError),
}
