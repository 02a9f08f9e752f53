//! Inventory operations: give, equip, use.

use delver_domain::{DomainError, InventoryEntry, ItemId, PlayerId};

use super::{EquipResult, GameEngine, GameError, InventoryActionResult, UseItemResult};

impl GameEngine<'_> {
    /// A player's inventory, sorted by item name.
    pub async fn inventory(&self, player_id: PlayerId) -> Result<Vec<InventoryEntry>, GameError> {
        self.player(player_id).await?;
        Ok(self.context.inventory().list_for_player(player_id).await?)
    }

    pub async fn give_item(
        &self,
        player_id: PlayerId,
        item_id: ItemId,
        quantity: u32,
    ) -> Result<InventoryActionResult, GameError> {
        if quantity == 0 {
            return Err(DomainError::validation("Quantity must be at least 1").into());
        }
        let player = self.player(player_id).await?;
        let item = self.item(item_id).await?;

        self.context
            .inventory()
            .add(player_id, item_id, quantity)
            .await?;

        tracing::debug!(player_id = %player_id, item_id = %item_id, quantity, "Gave item");
        Ok(InventoryActionResult {
            player_name: player.name.to_string(),
            item_name: item.name,
            quantity,
        })
    }

    /// Equip a weapon or armor the player carries. Any other equipped item of
    /// the same kind is unequipped.
    pub async fn equip_item(
        &self,
        player_id: PlayerId,
        item_id: ItemId,
    ) -> Result<EquipResult, GameError> {
        let player = self.player(player_id).await?;
        let entries = self.context.inventory().list_for_player(player_id).await?;

        let entry = match entries.iter().find(|e| e.item.id == item_id) {
            Some(entry) => entry,
            None => {
                let item = self.item(item_id).await?;
                return Err(GameError::ItemNotInInventory {
                    player: player.name.to_string(),
                    item: item.name,
                });
            }
        };
        if !entry.item.is_equippable() {
            return Err(GameError::NotEquippable(entry.item.name.clone()));
        }
        if entry.equipped {
            return Ok(EquipResult {
                item_name: entry.item.name.clone(),
                replaced: None,
            });
        }

        let mut replaced = None;
        for other in entries
            .iter()
            .filter(|e| e.equipped && e.item.kind == entry.item.kind && e.item.id != item_id)
        {
            self.context
                .inventory()
                .set_equipped(player_id, other.item.id, false)
                .await?;
            replaced = Some(other.item.name.clone());
        }
        self.context
            .inventory()
            .set_equipped(player_id, item_id, true)
            .await?;

        tracing::debug!(player_id = %player_id, item_id = %item_id, "Equipped item");
        Ok(EquipResult {
            item_name: entry.item.name.clone(),
            replaced,
        })
    }

    /// Consume one of a carried consumable, healing the player.
    pub async fn use_item(
        &self,
        player_id: PlayerId,
        item_id: ItemId,
    ) -> Result<UseItemResult, GameError> {
        let mut player = self.player(player_id).await?;
        let entries = self.context.inventory().list_for_player(player_id).await?;

        let Some(entry) = entries.into_iter().find(|e| e.item.id == item_id) else {
            let item = self.item(item_id).await?;
            return Err(GameError::ItemNotInInventory {
                player: player.name.to_string(),
                item: item.name,
            });
        };
        if !entry.item.is_consumable() {
            return Err(GameError::NotConsumable(entry.item.name));
        }

        let healed = player.heal(entry.item.heal);
        self.context.inventory().consume(&player, item_id).await?;

        tracing::debug!(player_id = %player_id, item_id = %item_id, healed, "Used item");
        Ok(UseItemResult {
            item_name: entry.item.name,
            healed,
            health: player.health,
            max_health: player.max_health(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use delver_domain::{InventoryEntry, Item, ItemKind};
    use mockall::predicate::eq;

    use super::*;
    use crate::game::test_support::{player_named, potion, sword, MockContext};
    use crate::infrastructure::clock::{FixedRandom, SystemClock};
    use crate::infrastructure::ports::RepoError;

    fn engine(ctx: &MockContext) -> GameEngine<'_> {
        GameEngine::new(ctx, Arc::new(FixedRandom(0)), Arc::new(SystemClock::new()))
    }

    fn held(item: &Item, quantity: u32, equipped: bool) -> InventoryEntry {
        InventoryEntry {
            item: item.clone(),
            quantity,
            equipped,
        }
    }

    #[tokio::test]
    async fn give_item_rejects_zero_quantity() {
        let ctx = MockContext::new();

        let err = engine(&ctx)
            .give_item(PlayerId::new(), ItemId::new(), 0)
            .await
            .expect_err("zero quantity");

        assert!(matches!(err, GameError::Domain(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn give_item_requires_a_known_item() {
        let p = player_named("Aria");
        let pid = p.id;
        let mut ctx = MockContext::new();
        ctx.players.expect_get().returning(move |_| Ok(Some(p.clone())));
        ctx.items.expect_get().returning(|_| Ok(None));
        ctx.inventory.expect_add().never();

        let err = engine(&ctx)
            .give_item(pid, ItemId::new(), 1)
            .await
            .expect_err("unknown item");

        assert!(matches!(err, GameError::ItemNotFound(_)));
    }

    #[tokio::test]
    async fn equipping_a_weapon_swaps_out_the_old_one() {
        let p = player_named("Aria");
        let pid = p.id;
        let old = sword(2);
        let new = Item::new("Axe", ItemKind::Weapon).with_attack(4);
        let armor = Item::new("Mail", ItemKind::Armor).with_defense(2);
        let entries = vec![held(&new, 1, false), held(&armor, 1, true), held(&old, 1, true)];

        let mut ctx = MockContext::new();
        ctx.players.expect_get().returning(move |_| Ok(Some(p.clone())));
        ctx.inventory
            .expect_list_for_player()
            .returning(move |_| Ok(entries.clone()));
        ctx.inventory
            .expect_set_equipped()
            .with(eq(pid), eq(old.id), eq(false))
            .times(1)
            .returning(|_, _, _| Ok(()));
        ctx.inventory
            .expect_set_equipped()
            .with(eq(pid), eq(new.id), eq(true))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let result = engine(&ctx).equip_item(pid, new.id).await.expect("equip");

        assert_eq!(result.item_name, "Axe");
        assert_eq!(result.replaced.as_deref(), Some("Sword"));
    }

    #[tokio::test]
    async fn potions_cannot_be_equipped() {
        let p = player_named("Aria");
        let pid = p.id;
        let flask = potion(10);
        let flask_id = flask.id;
        let entries = vec![held(&flask, 2, false)];

        let mut ctx = MockContext::new();
        ctx.players.expect_get().returning(move |_| Ok(Some(p.clone())));
        ctx.inventory
            .expect_list_for_player()
            .returning(move |_| Ok(entries.clone()));
        ctx.inventory.expect_set_equipped().never();

        let err = engine(&ctx)
            .equip_item(pid, flask_id)
            .await
            .expect_err("not equippable");

        assert!(matches!(err, GameError::NotEquippable(name) if name == "Potion"));
    }

    #[tokio::test]
    async fn equipping_something_not_carried_names_the_item() {
        let p = player_named("Aria");
        let pid = p.id;
        let blade = sword(3);
        let blade_id = blade.id;

        let mut ctx = MockContext::new();
        ctx.players.expect_get().returning(move |_| Ok(Some(p.clone())));
        ctx.inventory
            .expect_list_for_player()
            .returning(|_| Ok(vec![]));
        ctx.items
            .expect_get()
            .returning(move |_| Ok(Some(blade.clone())));

        let err = engine(&ctx)
            .equip_item(pid, blade_id)
            .await
            .expect_err("not carried");

        assert!(matches!(
            err,
            GameError::ItemNotInInventory { ref player, ref item } if player == "Aria" && item == "Sword"
        ));
    }

    #[tokio::test]
    async fn using_a_potion_heals_and_consumes_one() {
        let mut p = player_named("Aria");
        p.health = 12;
        let pid = p.id;
        let flask = potion(10);
        let flask_id = flask.id;
        let entries = vec![held(&flask, 2, false)];

        let mut ctx = MockContext::new();
        ctx.players.expect_get().returning(move |_| Ok(Some(p.clone())));
        ctx.inventory
            .expect_list_for_player()
            .returning(move |_| Ok(entries.clone()));
        ctx.inventory
            .expect_consume()
            .withf(move |p, item| p.health == 22 && *item == flask_id)
            .times(1)
            .returning(|_, _| Ok(()));
        ctx.inventory.expect_remove().never();
        ctx.players.expect_save().never();

        let result = engine(&ctx).use_item(pid, flask_id).await.expect("use");

        assert_eq!(result.healed, 10);
        assert_eq!(result.health, 22);
        assert_eq!(result.max_health, 30);
    }

    #[tokio::test]
    async fn a_failed_consume_reports_a_storage_error() {
        let mut p = player_named("Aria");
        p.health = 12;
        let pid = p.id;
        let flask = potion(10);
        let flask_id = flask.id;
        let entries = vec![held(&flask, 1, false)];

        let mut ctx = MockContext::new();
        ctx.players.expect_get().returning(move |_| Ok(Some(p.clone())));
        ctx.inventory
            .expect_list_for_player()
            .returning(move |_| Ok(entries.clone()));
        ctx.inventory
            .expect_consume()
            .returning(|_, _| Err(RepoError::database("consume_item", "disk full")));
        ctx.players.expect_save().never();

        let err = engine(&ctx)
            .use_item(pid, flask_id)
            .await
            .expect_err("storage down");

        assert!(matches!(err, GameError::Repo(_)));
    }

    #[tokio::test]
    async fn weapons_cannot_be_used() {
        let p = player_named("Aria");
        let pid = p.id;
        let blade = sword(3);
        let blade_id = blade.id;
        let entries = vec![held(&blade, 1, true)];

        let mut ctx = MockContext::new();
        ctx.players.expect_get().returning(move |_| Ok(Some(p.clone())));
        ctx.inventory
            .expect_list_for_player()
            .returning(move |_| Ok(entries.clone()));
        ctx.inventory.expect_consume().never();

        let err = engine(&ctx)
            .use_item(pid, blade_id)
            .await
            .expect_err("not consumable");

        assert!(matches!(err, GameError::NotConsumable(_)));
    }
}
