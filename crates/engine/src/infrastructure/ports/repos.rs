//! Database ports, one per aggregate, plus the data context that owns them.

use async_trait::async_trait;
use delver_domain::{InventoryEntry, Item, ItemId, Monster, MonsterId, Player, PlayerId};

use super::error::RepoError;

// =============================================================================
// Players
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerRepo: Send + Sync {
    async fn get(&self, id: PlayerId) -> Result<Option<Player>, RepoError>;
    /// Exact, case-insensitive name lookup.
    async fn find_by_name(&self, name: &str) -> Result<Option<Player>, RepoError>;
    /// All players ordered by name.
    async fn list(&self) -> Result<Vec<Player>, RepoError>;
    /// Case-insensitive substring match on name, ordered by name.
    async fn search(&self, query: &str) -> Result<Vec<Player>, RepoError>;
    /// Insert or update.
    async fn save(&self, player: &Player) -> Result<(), RepoError>;
    /// Returns false when no such player existed.
    async fn delete(&self, id: PlayerId) -> Result<bool, RepoError>;
    /// Highest experience first, ties broken by name.
    async fn leaderboard(&self, limit: u32) -> Result<Vec<Player>, RepoError>;
}

// =============================================================================
// Items
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepo: Send + Sync {
    async fn get(&self, id: ItemId) -> Result<Option<Item>, RepoError>;
    async fn list(&self) -> Result<Vec<Item>, RepoError>;
}

// =============================================================================
// Monsters
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MonsterRepo: Send + Sync {
    async fn get(&self, id: MonsterId) -> Result<Option<Monster>, RepoError>;
    /// Ordered by experience reward, weakest first.
    async fn list(&self) -> Result<Vec<Monster>, RepoError>;
}

// =============================================================================
// Inventory
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepo: Send + Sync {
    /// Entries ordered by item name.
    async fn list_for_player(&self, player_id: PlayerId) -> Result<Vec<InventoryEntry>, RepoError>;
    /// Adds to any quantity already held.
    async fn add(&self, player_id: PlayerId, item_id: ItemId, quantity: u32)
        -> Result<(), RepoError>;
    /// Removes up to `quantity`; the row disappears when nothing is left.
    async fn remove(
        &self,
        player_id: PlayerId,
        item_id: ItemId,
        quantity: u32,
    ) -> Result<(), RepoError>;
    /// Use up one of `item_id` and save `player` in a single transaction.
    /// Nothing changes if the item is not held.
    async fn consume(&self, player: &Player, item_id: ItemId) -> Result<(), RepoError>;
    async fn set_equipped(
        &self,
        player_id: PlayerId,
        item_id: ItemId,
        equipped: bool,
    ) -> Result<(), RepoError>;
}

// =============================================================================
// Data Context
// =============================================================================

/// Outcome of seeding the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// False when data already existed and nothing was written.
    pub seeded: bool,
    pub players: usize,
    pub items: usize,
    pub monsters: usize,
}

/// The game's persistent store.
///
/// Owned by the composition root for the whole run. `close` must be awaited
/// exactly once, after everything borrowing the context is gone.
#[async_trait]
pub trait DataContext: Send + Sync {
    fn players(&self) -> &dyn PlayerRepo;
    fn items(&self) -> &dyn ItemRepo;
    fn monsters(&self) -> &dyn MonsterRepo;
    fn inventory(&self) -> &dyn InventoryRepo;

    /// Populate default data if the store is empty. A no-op otherwise.
    async fn seed(&self) -> Result<SeedReport, RepoError>;

    /// Release the underlying storage.
    async fn close(&self);
}
