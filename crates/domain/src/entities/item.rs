//! Item entity - Objects a player can carry, equip, or consume
//!
//! Items are global templates. Possession lives in the inventory table:
//!
//! ```text
//! inventory(player_id, item_id, quantity, equipped)
//! ```

use serde::{Deserialize, Serialize};

use crate::ids::ItemId;

/// An object that can be carried by a player.
///
/// Plain data struct: any combination of values is valid. Stats that don't
/// apply to the item's kind are simply zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    /// Bonus to attack when equipped (weapons)
    #[serde(default)]
    pub attack: u32,
    /// Bonus to defense when equipped (armor)
    #[serde(default)]
    pub defense: u32,
    /// Health restored when used (consumables)
    #[serde(default)]
    pub heal: u32,
    /// Value in gold
    #[serde(default)]
    pub value: u32,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            kind,
            attack: 0,
            defense: 0,
            heal: 0,
            value: 0,
        }
    }

    pub fn with_attack(mut self, attack: u32) -> Self {
        self.attack = attack;
        self
    }

    pub fn with_defense(mut self, defense: u32) -> Self {
        self.defense = defense;
        self
    }

    pub fn with_heal(mut self, heal: u32) -> Self {
        self.heal = heal;
        self
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    pub fn is_equippable(&self) -> bool {
        matches!(self.kind, ItemKind::Weapon | ItemKind::Armor)
    }

    pub fn is_consumable(&self) -> bool {
        self.kind == ItemKind::Consumable
    }
}

/// An item held by a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub item: Item,
    pub quantity: u32,
    /// Whether the item is currently equipped
    pub equipped: bool,
}

/// What kind of item this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon,
    Armor,
    Consumable,
    Treasure,
    /// Unknown kind for forward compatibility
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weapon => write!(f, "Weapon"),
            Self::Armor => write!(f, "Armor"),
            Self::Consumable => write!(f, "Consumable"),
            Self::Treasure => write!(f, "Treasure"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

impl std::str::FromStr for ItemKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Weapon" => Ok(Self::Weapon),
            "Armor" => Ok(Self::Armor),
            "Consumable" => Ok(Self::Consumable),
            "Treasure" => Ok(Self::Treasure),
            _ => Ok(Self::Unknown),
        }
    }
}
