//! Player entity - an adventurer created from the menu

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::PlayerId;
use crate::value_objects::PlayerName;

/// Health a level-1 player starts with
pub const STARTING_HEALTH: u32 = 30;
/// Gold a new player starts with
pub const STARTING_GOLD: u32 = 10;
/// Experience needed for each level after the first
pub const EXPERIENCE_PER_LEVEL: u32 = 100;
/// Max health gained per level
pub const HEALTH_PER_LEVEL: u32 = 5;

/// A player (adventurer).
///
/// Level and max health are derived from experience rather than stored, so
/// they can never disagree with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: PlayerName,
    pub experience: u32,
    pub health: u32,
    pub gold: u32,
    pub created_at: DateTime<Utc>,
}

impl Player {
    pub fn new(name: PlayerName, now: DateTime<Utc>) -> Self {
        Self {
            id: PlayerId::new(),
            name,
            experience: 0,
            health: STARTING_HEALTH,
            gold: STARTING_GOLD,
            created_at: now,
        }
    }

    pub fn level(&self) -> u32 {
        level_for(self.experience)
    }

    pub fn max_health(&self) -> u32 {
        STARTING_HEALTH + (self.level() - 1) * HEALTH_PER_LEVEL
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// Heal by up to `amount`, capped at max health. Returns the amount healed.
    /// Health already above the maximum is left alone.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = before
            .saturating_add(amount)
            .min(self.max_health())
            .max(before);
        self.health.saturating_sub(before)
    }

    pub fn restore(&mut self) {
        self.health = self.max_health();
    }

    /// Grant battle rewards. Returns true when the player gained a level,
    /// in which case health is refilled to the new maximum.
    pub fn award(&mut self, experience: u32, gold: u32) -> bool {
        let before = self.level();
        self.experience = self.experience.saturating_add(experience);
        self.gold = self.gold.saturating_add(gold);
        let leveled_up = self.level() > before;
        if leveled_up {
            self.restore();
        }
        leveled_up
    }

    pub fn spend_gold(&mut self, amount: u32) -> Result<(), DomainError> {
        if self.gold < amount {
            return Err(DomainError::constraint(format!(
                "{} needs {} gold but only has {}",
                self.name, amount, self.gold
            )));
        }
        self.gold -= amount;
        Ok(())
    }

    /// Penalty for losing a fight: left standing at 1 hp, half the gold gone.
    pub fn suffer_defeat(&mut self) {
        self.health = 1;
        self.gold /= 2;
    }
}

/// Level reached with the given experience.
pub fn level_for(experience: u32) -> u32 {
    1 + experience / EXPERIENCE_PER_LEVEL
}
