//! Mock-backed data context for engine unit tests.

use async_trait::async_trait;
use chrono::Utc;
use delver_domain::{Item, ItemKind, Monster, Player, PlayerName};

use crate::infrastructure::ports::{
    DataContext, InventoryRepo, ItemRepo, MockInventoryRepo, MockItemRepo, MockMonsterRepo,
    MockPlayerRepo, MonsterRepo, PlayerRepo, RepoError, SeedReport,
};

pub(crate) struct MockContext {
    pub players: MockPlayerRepo,
    pub items: MockItemRepo,
    pub monsters: MockMonsterRepo,
    pub inventory: MockInventoryRepo,
}

impl MockContext {
    pub fn new() -> Self {
        Self {
            players: MockPlayerRepo::new(),
            items: MockItemRepo::new(),
            monsters: MockMonsterRepo::new(),
            inventory: MockInventoryRepo::new(),
        }
    }
}

#[async_trait]
impl DataContext for MockContext {
    fn players(&self) -> &dyn PlayerRepo {
        &self.players
    }

    fn items(&self) -> &dyn ItemRepo {
        &self.items
    }

    fn monsters(&self) -> &dyn MonsterRepo {
        &self.monsters
    }

    fn inventory(&self) -> &dyn InventoryRepo {
        &self.inventory
    }

    async fn seed(&self) -> Result<SeedReport, RepoError> {
        Ok(SeedReport::default())
    }

    async fn close(&self) {}
}

pub(crate) fn player_named(name: &str) -> Player {
    Player::new(PlayerName::new(name).expect("valid name"), Utc::now())
}

pub(crate) fn sword(attack: u32) -> Item {
    Item::new("Sword", ItemKind::Weapon).with_attack(attack)
}

pub(crate) fn potion(heal: u32) -> Item {
    Item::new("Potion", ItemKind::Consumable).with_heal(heal)
}

pub(crate) fn rat() -> Monster {
    Monster::new("Rat", 4, 1, 0).with_rewards(10, 2)
}
