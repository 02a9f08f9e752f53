//! Game engine: the operations the menu can perform.
//!
//! The engine borrows the data context for its whole life and never owns
//! storage itself. Rules live in `delver_domain`; this layer loads, applies,
//! and saves.

mod battle;
mod error;
mod inventory;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use delver_domain::{DomainError, Item, ItemId, Monster, MonsterId, Player, PlayerId, PlayerName};

use crate::infrastructure::ports::{ClockPort, DataContext, RandomPort};

pub use battle::REST_COST;
pub use error::GameError;
pub use types::{BattleReport, EquipResult, InventoryActionResult, RestResult, UseItemResult};

pub struct GameEngine<'a> {
    context: &'a dyn DataContext,
    random: Arc<dyn RandomPort>,
    clock: Arc<dyn ClockPort>,
}

impl<'a> GameEngine<'a> {
    pub fn new(
        context: &'a dyn DataContext,
        random: Arc<dyn RandomPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            context,
            random,
            clock,
        }
    }

    // =========================================================================
    // Roster
    // =========================================================================

    pub async fn list_players(&self) -> Result<Vec<Player>, GameError> {
        Ok(self.context.players().list().await?)
    }

    /// Players whose name contains `query`, ignoring case. A blank query lists everyone.
    pub async fn search_players(&self, query: &str) -> Result<Vec<Player>, GameError> {
        let query = query.trim();
        if query.is_empty() {
            return self.list_players().await;
        }
        Ok(self.context.players().search(query).await?)
    }

    pub async fn leaderboard(&self, limit: u32) -> Result<Vec<Player>, GameError> {
        Ok(self.context.players().leaderboard(limit).await?)
    }

    pub async fn player(&self, id: PlayerId) -> Result<Player, GameError> {
        self.context
            .players()
            .get(id)
            .await?
            .ok_or(GameError::PlayerNotFound(id))
    }

    pub async fn create_player(&self, name: &str) -> Result<Player, GameError> {
        let name = PlayerName::new(name)?;
        self.ensure_name_free(&name, None).await?;

        let player = Player::new(name, self.clock.now());
        self.context.players().save(&player).await?;

        tracing::debug!(player_id = %player.id, name = %player.name, "Created player");
        Ok(player)
    }

    pub async fn rename_player(&self, id: PlayerId, name: &str) -> Result<Player, GameError> {
        let mut player = self.player(id).await?;
        let name = PlayerName::new(name)?;
        self.ensure_name_free(&name, Some(id)).await?;

        player.name = name;
        self.context.players().save(&player).await?;

        tracing::debug!(player_id = %player.id, name = %player.name, "Renamed player");
        Ok(player)
    }

    /// Delete a player and everything they carry. Returns the deleted player.
    pub async fn delete_player(&self, id: PlayerId) -> Result<Player, GameError> {
        let player = self.player(id).await?;
        if !self.context.players().delete(id).await? {
            return Err(GameError::PlayerNotFound(id));
        }

        tracing::debug!(player_id = %id, "Deleted player");
        Ok(player)
    }

    async fn ensure_name_free(
        &self,
        name: &PlayerName,
        except: Option<PlayerId>,
    ) -> Result<(), GameError> {
        match self.context.players().find_by_name(name.as_str()).await? {
            Some(existing) if Some(existing.id) != except => Err(DomainError::constraint(
                format!("A player named {} already exists", existing.name),
            )
            .into()),
            _ => Ok(()),
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub async fn list_items(&self) -> Result<Vec<Item>, GameError> {
        Ok(self.context.items().list().await?)
    }

    pub async fn list_monsters(&self) -> Result<Vec<Monster>, GameError> {
        Ok(self.context.monsters().list().await?)
    }

    async fn item(&self, id: ItemId) -> Result<Item, GameError> {
        self.context
            .items()
            .get(id)
            .await?
            .ok_or(GameError::ItemNotFound(id))
    }

    async fn monster(&self, id: MonsterId) -> Result<Monster, GameError> {
        self.context
            .monsters()
            .get(id)
            .await?
            .ok_or(GameError::MonsterNotFound(id))
    }
}
