//! Default dataset and the idempotent seeding routine.
//!
//! The dataset ships as JSON (`fixtures/seed.json`) embedded in the binary.
//! Names link holdings to items; ids are generated when the seed is applied.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use delver_domain::{Item, ItemId, ItemKind, Monster, Player, PlayerName};
use serde::Deserialize;
use sqlx::SqlitePool;

use super::inventory::add_holding;
use super::items::insert_item;
use super::monsters::insert_monster;
use super::players::upsert_player;
use super::rows::map_db_error;
use crate::infrastructure::ports::{RepoError, SeedReport};

const DEFAULT_SEED_JSON: &str = include_str!("../../../fixtures/seed.json");

/// A dataset to seed an empty store with.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedData {
    #[serde(default)]
    pub items: Vec<SeedItem>,
    #[serde(default)]
    pub monsters: Vec<SeedMonster>,
    #[serde(default)]
    pub players: Vec<SeedPlayer>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedItem {
    pub name: String,
    pub kind: ItemKind,
    #[serde(default)]
    pub attack: u32,
    #[serde(default)]
    pub defense: u32,
    #[serde(default)]
    pub heal: u32,
    #[serde(default)]
    pub value: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedMonster {
    pub name: String,
    pub health: u32,
    pub attack: u32,
    pub defense: u32,
    #[serde(default)]
    pub experience_reward: u32,
    #[serde(default)]
    pub gold_reward: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedPlayer {
    pub name: PlayerName,
    #[serde(default)]
    pub inventory: Vec<SeedHolding>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedHolding {
    /// Name of an item in the same dataset
    pub item: String,
    #[serde(default = "one")]
    pub quantity: u32,
    #[serde(default)]
    pub equipped: bool,
}

fn one() -> u32 {
    1
}

impl SeedData {
    pub fn parse(json: &str) -> Result<Self, RepoError> {
        serde_json::from_str(json).map_err(RepoError::serialization)
    }

    /// The dataset bundled with the game.
    pub fn default_dataset() -> Result<Self, RepoError> {
        Self::parse(DEFAULT_SEED_JSON)
    }
}

/// Insert `data` if the store holds no players, items, or monsters.
///
/// Runs in one transaction: either the whole dataset lands or nothing does.
pub(super) async fn apply(
    pool: &SqlitePool,
    data: &SeedData,
    now: DateTime<Utc>,
) -> Result<SeedReport, RepoError> {
    let mut tx = pool.begin().await.map_err(|e| map_db_error("seed", e))?;

    let existing: i64 = sqlx::query_scalar(
        r#"
        SELECT (SELECT COUNT(*) FROM players)
             + (SELECT COUNT(*) FROM items)
             + (SELECT COUNT(*) FROM monsters)
        "#,
    )
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| map_db_error("seed", e))?;

    if existing > 0 {
        tracing::debug!(existing, "Store already has data, skipping seed");
        return Ok(SeedReport::default());
    }

    let mut item_ids: HashMap<&str, ItemId> = HashMap::with_capacity(data.items.len());
    for seed in &data.items {
        let item = Item::new(seed.name.clone(), seed.kind)
            .with_attack(seed.attack)
            .with_defense(seed.defense)
            .with_heal(seed.heal)
            .with_value(seed.value);
        insert_item(&mut *tx, &item).await?;
        item_ids.insert(seed.name.as_str(), item.id);
    }

    for seed in &data.monsters {
        let monster = Monster::new(seed.name.clone(), seed.health, seed.attack, seed.defense)
            .with_rewards(seed.experience_reward, seed.gold_reward);
        insert_monster(&mut *tx, &monster).await?;
    }

    for seed in &data.players {
        let player = Player::new(seed.name.clone(), now);
        upsert_player(&mut *tx, &player).await?;

        for holding in &seed.inventory {
            let item_id = item_ids.get(holding.item.as_str()).copied().ok_or_else(|| {
                RepoError::serialization(format!(
                    "seed player {} holds unknown item {}",
                    seed.name, holding.item
                ))
            })?;
            if holding.quantity == 0 {
                return Err(RepoError::serialization(format!(
                    "seed player {} holds zero of {}",
                    seed.name, holding.item
                )));
            }
            add_holding(&mut *tx, player.id, item_id, holding.quantity, holding.equipped).await?;
        }
    }

    tx.commit().await.map_err(|e| map_db_error("seed", e))?;

    Ok(SeedReport {
        seeded: true,
        players: data.players.len(),
        items: data.items.len(),
        monsters: data.monsters.len(),
    })
}
