//! Turn-based combat resolution.
//!
//! Pure rules: randomness comes in through a `roll(min, max)` closure
//! (inclusive bounds) so the engine can inject its `RandomPort` and tests can
//! script every die.

use serde::{Deserialize, Serialize};

/// Base attack of an unarmed player
pub const BASE_ATTACK: u32 = 2;
/// Upper bound of the player's per-strike bonus roll
pub const PLAYER_ROLL_MAX: u32 = 3;
/// Upper bound of a monster's per-strike bonus roll
pub const MONSTER_ROLL_MAX: u32 = 2;
/// Fights that drag on this long end in a retreat
pub const MAX_ROUNDS: u32 = 50;

/// One side of a fight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combatant {
    pub health: u32,
    pub attack: u32,
    pub defense: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    Victory,
    Defeat,
    Retreat,
}

impl std::fmt::Display for BattleOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Victory => write!(f, "Victory"),
            Self::Defeat => write!(f, "Defeat"),
            Self::Retreat => write!(f, "Retreat"),
        }
    }
}

/// Result of a resolved fight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleLog {
    pub rounds: u32,
    pub outcome: BattleOutcome,
    pub player_health: u32,
    pub monster_health: u32,
}

/// Damage of a single strike. Every hit lands for at least 1.
pub fn strike_damage(attack: u32, bonus: u32, defense: u32) -> u32 {
    (attack + bonus).saturating_sub(defense).max(1)
}

/// Fight until one side drops or `MAX_ROUNDS` pass. The player strikes first
/// each round; the monster only answers if it is still standing.
pub fn resolve(
    player: Combatant,
    monster: Combatant,
    roll: &mut impl FnMut(u32, u32) -> u32,
) -> BattleLog {
    let mut player_health = player.health;
    let mut monster_health = monster.health;
    let mut rounds = 0;

    while rounds < MAX_ROUNDS {
        rounds += 1;

        let dealt = strike_damage(player.attack, roll(0, PLAYER_ROLL_MAX), monster.defense);
        monster_health = monster_health.saturating_sub(dealt);
        if monster_health == 0 {
            return BattleLog {
                rounds,
                outcome: BattleOutcome::Victory,
                player_health,
                monster_health,
            };
        }

        let taken = strike_damage(monster.attack, roll(0, MONSTER_ROLL_MAX), player.defense);
        player_health = player_health.saturating_sub(taken);
        if player_health == 0 {
            return BattleLog {
                rounds,
                outcome: BattleOutcome::Defeat,
                player_health,
                monster_health,
            };
        }
    }

    BattleLog {
        rounds,
        outcome: BattleOutcome::Retreat,
        player_health,
        monster_health,
    }
}
