//! Monster entity - opponents a player can fight

use serde::{Deserialize, Serialize};

use crate::ids::MonsterId;

/// A monster template.
///
/// Fighting a monster never consumes it; each fight starts from full health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    pub name: String,
    pub health: u32,
    pub attack: u32,
    pub defense: u32,
    pub experience_reward: u32,
    pub gold_reward: u32,
}

impl Monster {
    pub fn new(name: impl Into<String>, health: u32, attack: u32, defense: u32) -> Self {
        Self {
            id: MonsterId::new(),
            name: name.into(),
            health,
            attack,
            defense,
            experience_reward: 0,
            gold_reward: 0,
        }
    }

    pub fn with_rewards(mut self, experience: u32, gold: u32) -> Self {
        self.experience_reward = experience;
        self.gold_reward = gold;
        self
    }
}
