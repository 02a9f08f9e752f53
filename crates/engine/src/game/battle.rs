//! Fighting and resting.

use delver_domain::combat::{self, BattleOutcome, Combatant, BASE_ATTACK};
use delver_domain::{InventoryEntry, ItemKind, MonsterId, PlayerId};

use super::{BattleReport, GameEngine, GameError, RestResult};

/// Gold charged for a full rest
pub const REST_COST: u32 = 5;

/// Player's combat stats from what they have equipped.
fn player_combatant(health: u32, inventory: &[InventoryEntry]) -> Combatant {
    let equipped = inventory.iter().filter(|e| e.equipped);
    let (mut attack, mut defense) = (BASE_ATTACK, 0);
    for entry in equipped {
        match entry.item.kind {
            ItemKind::Weapon => attack += entry.item.attack,
            ItemKind::Armor => defense += entry.item.defense,
            _ => {}
        }
    }
    Combatant {
        health,
        attack,
        defense,
    }
}

impl GameEngine<'_> {
    pub async fn fight(
        &self,
        player_id: PlayerId,
        monster_id: MonsterId,
    ) -> Result<BattleReport, GameError> {
        let mut player = self.player(player_id).await?;
        if player.is_defeated() {
            return Err(GameError::PlayerDefeated(player.name.to_string()));
        }
        let monster = self.monster(monster_id).await?;
        let inventory = self.context.inventory().list_for_player(player_id).await?;

        let attacker = player_combatant(player.health, &inventory);
        let defender = Combatant {
            health: monster.health,
            attack: monster.attack,
            defense: monster.defense,
        };
        let mut roll = |min: u32, max: u32| self.random.gen_range(min, max);
        let log = combat::resolve(attacker, defender, &mut roll);

        let (experience_gained, gold_gained, leveled_up) = match log.outcome {
            BattleOutcome::Victory => {
                player.health = log.player_health;
                let leveled_up = player.award(monster.experience_reward, monster.gold_reward);
                (monster.experience_reward, monster.gold_reward, leveled_up)
            }
            BattleOutcome::Defeat => {
                player.suffer_defeat();
                (0, 0, false)
            }
            BattleOutcome::Retreat => {
                player.health = log.player_health;
                (0, 0, false)
            }
        };
        self.context.players().save(&player).await?;

        tracing::debug!(
            player_id = %player_id,
            monster_id = %monster_id,
            outcome = %log.outcome,
            rounds = log.rounds,
            "Fight resolved"
        );
        Ok(BattleReport {
            player_name: player.name.to_string(),
            monster_name: monster.name,
            rounds: log.rounds,
            outcome: log.outcome,
            experience_gained,
            gold_gained,
            leveled_up,
            level: player.level(),
            player_health: player.health,
        })
    }

    /// Pay `REST_COST` gold to recover to full health. Free (and a no-op) at
    /// full health.
    pub async fn rest(&self, player_id: PlayerId) -> Result<RestResult, GameError> {
        let mut player = self.player(player_id).await?;
        if player.health >= player.max_health() {
            return Ok(RestResult {
                gold_spent: 0,
                health: player.health,
            });
        }

        player.spend_gold(REST_COST)?;
        player.restore();
        self.context.players().save(&player).await?;

        tracing::debug!(player_id = %player_id, "Player rested");
        Ok(RestResult {
            gold_spent: REST_COST,
            health: player.health,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use delver_domain::{DomainError, Item, Monster, STARTING_GOLD, STARTING_HEALTH};

    use super::*;
    use crate::game::test_support::{player_named, rat, sword, MockContext};
    use crate::infrastructure::clock::{FixedRandom, SystemClock};

    fn engine(ctx: &MockContext) -> GameEngine<'_> {
        GameEngine::new(ctx, Arc::new(FixedRandom(0)), Arc::new(SystemClock::new()))
    }

    #[test]
    fn equipped_gear_adds_to_combat_stats() {
        let blade = sword(3);
        let mail = Item::new("Mail", ItemKind::Armor).with_defense(2);
        let spare = sword(9);
        let inventory = vec![
            InventoryEntry { item: blade, quantity: 1, equipped: true },
            InventoryEntry { item: mail, quantity: 1, equipped: true },
            InventoryEntry { item: spare, quantity: 1, equipped: false },
        ];

        let stats = player_combatant(20, &inventory);

        assert_eq!(stats, Combatant { health: 20, attack: BASE_ATTACK + 3, defense: 2 });
    }

    #[tokio::test]
    async fn winning_a_fight_grants_rewards() {
        let p = player_named("Aria");
        let pid = p.id;
        let monster = rat();
        let mid = monster.id;

        let mut ctx = MockContext::new();
        ctx.players.expect_get().returning(move |_| Ok(Some(p.clone())));
        ctx.monsters
            .expect_get()
            .returning(move |_| Ok(Some(monster.clone())));
        ctx.inventory
            .expect_list_for_player()
            .returning(|_| Ok(vec![]));
        // Rat: 4 hp, 1 attack. Player deals 2 per strike, takes 1.
        ctx.players
            .expect_save()
            .withf(|p| p.experience == 10 && p.gold == STARTING_GOLD + 2 && p.health == STARTING_HEALTH - 1)
            .times(1)
            .returning(|_| Ok(()));

        let report = engine(&ctx).fight(pid, mid).await.expect("fight");

        assert_eq!(report.outcome, BattleOutcome::Victory);
        assert_eq!(report.rounds, 2);
        assert_eq!(report.experience_gained, 10);
        assert_eq!(report.gold_gained, 2);
        assert!(!report.leveled_up);
        assert_eq!(report.player_health, STARTING_HEALTH - 1);
    }

    #[tokio::test]
    async fn losing_a_fight_costs_half_the_gold() {
        let p = player_named("Aria");
        let pid = p.id;
        let troll = Monster::new("Troll", 500, 40, 10).with_rewards(200, 50);
        let mid = troll.id;

        let mut ctx = MockContext::new();
        ctx.players.expect_get().returning(move |_| Ok(Some(p.clone())));
        ctx.monsters
            .expect_get()
            .returning(move |_| Ok(Some(troll.clone())));
        ctx.inventory
            .expect_list_for_player()
            .returning(|_| Ok(vec![]));
        ctx.players
            .expect_save()
            .withf(|p| p.health == 1 && p.gold == STARTING_GOLD / 2 && p.experience == 0)
            .times(1)
            .returning(|_| Ok(()));

        let report = engine(&ctx).fight(pid, mid).await.expect("fight");

        assert_eq!(report.outcome, BattleOutcome::Defeat);
        assert_eq!(report.experience_gained, 0);
        assert_eq!(report.player_health, 1);
    }

    #[tokio::test]
    async fn a_downed_player_cannot_fight() {
        let mut p = player_named("Aria");
        p.health = 0;
        let pid = p.id;

        let mut ctx = MockContext::new();
        ctx.players.expect_get().returning(move |_| Ok(Some(p.clone())));
        ctx.monsters.expect_get().never();
        ctx.players.expect_save().never();

        let err = engine(&ctx)
            .fight(pid, MonsterId::new())
            .await
            .expect_err("downed");

        assert!(matches!(err, GameError::PlayerDefeated(_)));
    }

    #[tokio::test]
    async fn fighting_an_unknown_monster_fails() {
        let p = player_named("Aria");
        let pid = p.id;

        let mut ctx = MockContext::new();
        ctx.players.expect_get().returning(move |_| Ok(Some(p.clone())));
        ctx.monsters.expect_get().returning(|_| Ok(None));

        let err = engine(&ctx)
            .fight(pid, MonsterId::new())
            .await
            .expect_err("unknown monster");

        assert!(matches!(err, GameError::MonsterNotFound(_)));
    }

    #[tokio::test]
    async fn resting_restores_health_for_gold() {
        let mut p = player_named("Aria");
        p.health = 4;
        let pid = p.id;

        let mut ctx = MockContext::new();
        ctx.players.expect_get().returning(move |_| Ok(Some(p.clone())));
        ctx.players
            .expect_save()
            .withf(|p| p.health == STARTING_HEALTH && p.gold == STARTING_GOLD - REST_COST)
            .times(1)
            .returning(|_| Ok(()));

        let result = engine(&ctx).rest(pid).await.expect("rest");

        assert_eq!(result.gold_spent, REST_COST);
        assert_eq!(result.health, STARTING_HEALTH);
    }

    #[tokio::test]
    async fn resting_at_full_health_is_free() {
        let p = player_named("Aria");
        let pid = p.id;

        let mut ctx = MockContext::new();
        ctx.players.expect_get().returning(move |_| Ok(Some(p.clone())));
        ctx.players.expect_save().never();

        let result = engine(&ctx).rest(pid).await.expect("rest");

        assert_eq!(result.gold_spent, 0);
    }

    #[tokio::test]
    async fn resting_without_gold_fails() {
        let mut p = player_named("Aria");
        p.health = 4;
        p.gold = REST_COST - 1;
        let pid = p.id;

        let mut ctx = MockContext::new();
        ctx.players.expect_get().returning(move |_| Ok(Some(p.clone())));
        ctx.players.expect_save().never();

        let err = engine(&ctx).rest(pid).await.expect_err("too poor");

        assert!(matches!(err, GameError::Domain(DomainError::Constraint(_))));
    }
}
