//! Results returned by game operations for the menu to render.

use delver_domain::BattleOutcome;

/// Result of moving items into an inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryActionResult {
    pub player_name: String,
    pub item_name: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipResult {
    pub item_name: String,
    /// Item of the same kind that was unequipped to make room
    pub replaced: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseItemResult {
    pub item_name: String,
    pub healed: u32,
    pub health: u32,
    pub max_health: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestResult {
    pub gold_spent: u32,
    pub health: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleReport {
    pub player_name: String,
    pub monster_name: String,
    pub rounds: u32,
    pub outcome: BattleOutcome,
    pub experience_gained: u32,
    pub gold_gained: u32,
    pub leveled_up: bool,
    pub level: u32,
    pub player_health: u32,
}
