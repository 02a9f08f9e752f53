//! Interactive console menu.
//!
//! Reads one choice per line from `input`, dispatches it to the engine, and
//! writes results to `output`. Generic over tokio I/O so tests can script a
//! session with a byte slice and capture the output in a `Vec<u8>`.

use delver_domain::{BattleOutcome, InventoryEntry, Item, Monster, Player};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::game::{GameEngine, GameError};
use crate::infrastructure::config::DEFAULT_LEADERBOARD_SIZE;

const OPTIONS: &str = "\
1) List players         6) Give item
2) Create player        7) Equip item
3) Rename player        8) Use item
4) Delete player        9) Fight a monster
5) Show inventory      10) Rest
11) Leaderboard        12) Search players
0) Exit";

/// Session-ending failures. Game errors never end a session.
#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A parsed menu selection
#[derive(Debug, Clone, PartialEq, Eq)]
enum Choice {
    ListPlayers,
    CreatePlayer,
    RenamePlayer,
    DeletePlayer,
    ShowInventory,
    GiveItem,
    EquipItem,
    UseItem,
    Fight,
    Rest,
    Leaderboard,
    SearchPlayers,
    Exit,
    Unknown(String),
}

impl Choice {
    fn parse(input: &str) -> Self {
        match input.trim().to_ascii_lowercase().as_str() {
            "1" => Self::ListPlayers,
            "2" => Self::CreatePlayer,
            "3" => Self::RenamePlayer,
            "4" => Self::DeletePlayer,
            "5" => Self::ShowInventory,
            "6" => Self::GiveItem,
            "7" => Self::EquipItem,
            "8" => Self::UseItem,
            "9" => Self::Fight,
            "10" => Self::Rest,
            "11" => Self::Leaderboard,
            "12" => Self::SearchPlayers,
            "0" | "q" | "quit" | "exit" => Self::Exit,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Why a single action stopped early
#[derive(Debug, thiserror::Error)]
enum ActionError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Bad input at a prompt; the message is shown and the menu re-prompts
    #[error("{0}")]
    Invalid(String),

    #[error("end of input")]
    EndOfInput,
}

pub struct Menu<'e, R, W> {
    engine: &'e GameEngine<'e>,
    input: R,
    output: W,
    leaderboard_size: u32,
}

impl<'e, R, W> Menu<'e, R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(engine: &'e GameEngine<'e>, input: R, output: W) -> Self {
        Self {
            engine,
            input,
            output,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
        }
    }

    pub fn with_leaderboard_size(mut self, size: u32) -> Self {
        self.leaderboard_size = size.max(1);
        self
    }

    /// Run until the user exits or input ends.
    pub async fn show(&mut self) -> Result<(), MenuError> {
        tracing::info!("Menu session started");

        loop {
            self.say("").await?;
            self.say(OPTIONS).await?;
            let Some(line) = self.read_prompted("> ").await? else {
                break;
            };

            let choice = Choice::parse(&line);
            if choice == Choice::Exit {
                break;
            }

            match self.handle(choice).await {
                Ok(()) => {}
                Err(ActionError::Game(e)) => {
                    tracing::warn!(error = %e, "Game operation failed");
                    self.say(&format!("Error: {e}")).await?;
                }
                Err(ActionError::Invalid(message)) => self.say(&message).await?,
                Err(ActionError::EndOfInput) => break,
                Err(ActionError::Io(e)) => return Err(MenuError::Io(e)),
            }
        }

        self.say("Goodbye!").await?;
        tracing::info!("Menu session ended");
        Ok(())
    }

    async fn handle(&mut self, choice: Choice) -> Result<(), ActionError> {
        match choice {
            Choice::ListPlayers => {
                let players = self.engine.list_players().await?;
                self.print_players(&players, "No players yet.").await
            }
            Choice::CreatePlayer => self.create_player().await,
            Choice::RenamePlayer => self.rename_player().await,
            Choice::DeletePlayer => self.delete_player().await,
            Choice::ShowInventory => self.show_inventory().await,
            Choice::GiveItem => self.give_item().await,
            Choice::EquipItem => self.equip_item().await,
            Choice::UseItem => self.use_item().await,
            Choice::Fight => self.fight().await,
            Choice::Rest => self.rest().await,
            Choice::Leaderboard => self.leaderboard().await,
            Choice::SearchPlayers => {
                let query = self.ask("Search for: ").await?;
                let players = self.engine.search_players(&query).await?;
                self.print_players(&players, "No matching players.").await
            }
            Choice::Exit => Ok(()),
            Choice::Unknown(raw) => Err(ActionError::Invalid(format!(
                "Unknown choice '{raw}'. Pick a number from the menu."
            ))),
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    async fn create_player(&mut self) -> Result<(), ActionError> {
        let name = self.ask("Name: ").await?;
        let player = self.engine.create_player(&name).await?;
        self.say(&format!("Created {}.", player.name)).await?;
        Ok(())
    }

    async fn rename_player(&mut self) -> Result<(), ActionError> {
        let player = self.choose_player().await?;
        let name = self.ask("New name: ").await?;
        let renamed = self.engine.rename_player(player.id, &name).await?;
        self.say(&format!("Renamed {} to {}.", player.name, renamed.name))
            .await?;
        Ok(())
    }

    async fn delete_player(&mut self) -> Result<(), ActionError> {
        let player = self.choose_player().await?;
        let answer = self
            .ask(&format!("Delete {} and everything they carry? (y/n): ", player.name))
            .await?;
        if !matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes") {
            self.say("Cancelled.").await?;
            return Ok(());
        }
        let deleted = self.engine.delete_player(player.id).await?;
        self.say(&format!("Deleted {}.", deleted.name)).await?;
        Ok(())
    }

    async fn show_inventory(&mut self) -> Result<(), ActionError> {
        let player = self.choose_player().await?;
        let entries = self.engine.inventory(player.id).await?;
        if entries.is_empty() {
            self.say(&format!("{} carries nothing.", player.name)).await?;
            return Ok(());
        }
        self.say(&format!(
            "{} ({}/{} hp, {} gold) carries:",
            player.name,
            player.health,
            player.max_health(),
            player.gold
        ))
        .await?;
        for entry in &entries {
            self.say(&format!("  {}", describe_entry(entry))).await?;
        }
        Ok(())
    }

    async fn give_item(&mut self) -> Result<(), ActionError> {
        let player = self.choose_player().await?;
        let items = self.engine.list_items().await?;
        let index = self.pick("Item", &items, describe_item).await?;
        let raw = self.ask("Quantity [1]: ").await?;
        let quantity = if raw.is_empty() {
            1
        } else {
            raw.parse::<u32>()
                .map_err(|_| ActionError::Invalid(format!("'{raw}' is not a quantity.")))?
        };

        let result = self
            .engine
            .give_item(player.id, items[index].id, quantity)
            .await?;
        self.say(&format!(
            "Gave {} x {} to {}.",
            result.quantity, result.item_name, result.player_name
        ))
        .await?;
        Ok(())
    }

    async fn equip_item(&mut self) -> Result<(), ActionError> {
        let player = self.choose_player().await?;
        let entries = self.engine.inventory(player.id).await?;
        let index = self.pick("Item", &entries, describe_entry).await?;

        let result = self
            .engine
            .equip_item(player.id, entries[index].item.id)
            .await?;
        let message = match result.replaced {
            Some(old) => format!("Equipped {} (replacing {old}).", result.item_name),
            None => format!("Equipped {}.", result.item_name),
        };
        self.say(&message).await?;
        Ok(())
    }

    async fn use_item(&mut self) -> Result<(), ActionError> {
        let player = self.choose_player().await?;
        let entries = self.engine.inventory(player.id).await?;
        let index = self.pick("Item", &entries, describe_entry).await?;

        let result = self
            .engine
            .use_item(player.id, entries[index].item.id)
            .await?;
        self.say(&format!(
            "Used {}: healed {} ({}/{} hp).",
            result.item_name, result.healed, result.health, result.max_health
        ))
        .await?;
        Ok(())
    }

    async fn fight(&mut self) -> Result<(), ActionError> {
        let player = self.choose_player().await?;
        let monsters = self.engine.list_monsters().await?;
        let index = self.pick("Monster", &monsters, describe_monster).await?;

        let report = self.engine.fight(player.id, monsters[index].id).await?;
        let headline = match report.outcome {
            BattleOutcome::Victory => format!(
                "{} defeated the {} in {} rounds! +{} xp, +{} gold.",
                report.player_name,
                report.monster_name,
                report.rounds,
                report.experience_gained,
                report.gold_gained
            ),
            BattleOutcome::Defeat => format!(
                "{} was beaten by the {} after {} rounds and lost half their gold.",
                report.player_name, report.monster_name, report.rounds
            ),
            BattleOutcome::Retreat => format!(
                "{} retreated from the {} after {} rounds.",
                report.player_name, report.monster_name, report.rounds
            ),
        };
        self.say(&headline).await?;
        if report.leveled_up {
            self.say(&format!("Level up! {} is now level {}.", report.player_name, report.level))
                .await?;
        }
        self.say(&format!("Health: {}", report.player_health)).await?;
        Ok(())
    }

    async fn rest(&mut self) -> Result<(), ActionError> {
        let player = self.choose_player().await?;
        let result = self.engine.rest(player.id).await?;
        let message = if result.gold_spent == 0 {
            format!("{} is already at full health.", player.name)
        } else {
            format!(
                "{} rests for {} gold and is back to {} hp.",
                player.name, result.gold_spent, result.health
            )
        };
        self.say(&message).await?;
        Ok(())
    }

    async fn leaderboard(&mut self) -> Result<(), ActionError> {
        let players = self.engine.leaderboard(self.leaderboard_size).await?;
        if players.is_empty() {
            self.say("No players yet.").await?;
            return Ok(());
        }
        self.say("Leaderboard:").await?;
        for (rank, player) in players.iter().enumerate() {
            self.say(&format!(
                "{:>3}. {:<20} level {:<3} {} xp",
                rank + 1,
                player.name,
                player.level(),
                player.experience
            ))
            .await?;
        }
        Ok(())
    }

    // =========================================================================
    // Prompting
    // =========================================================================

    async fn choose_player(&mut self) -> Result<Player, ActionError> {
        let mut players = self.engine.list_players().await?;
        let index = self.pick("Player", &players, describe_player).await?;
        Ok(players.swap_remove(index))
    }

    /// Print a numbered list and read a 1-based selection.
    async fn pick<T>(
        &mut self,
        noun: &str,
        options: &[T],
        describe: impl Fn(&T) -> String,
    ) -> Result<usize, ActionError> {
        if options.is_empty() {
            return Err(ActionError::Invalid(format!(
                "No {} to choose from.",
                noun.to_lowercase()
            )));
        }
        for (i, option) in options.iter().enumerate() {
            self.say(&format!("{:>3}. {}", i + 1, describe(option))).await?;
        }

        let raw = self.ask(&format!("{noun} number: ")).await?;
        match raw.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => Ok(n - 1),
            _ => Err(ActionError::Invalid(format!("Invalid selection '{raw}'."))),
        }
    }

    async fn ask(&mut self, prompt: &str) -> Result<String, ActionError> {
        self.read_prompted(prompt)
            .await?
            .ok_or(ActionError::EndOfInput)
    }

    /// Write `prompt` and read one trimmed line. `None` at end of input.
    async fn read_prompted(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        self.output.write_all(prompt.as_bytes()).await?;
        self.output.flush().await?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    async fn say(&mut self, text: &str) -> std::io::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await
    }

    async fn print_players(&mut self, players: &[Player], empty: &str) -> Result<(), ActionError> {
        if players.is_empty() {
            self.say(empty).await?;
            return Ok(());
        }
        for (i, player) in players.iter().enumerate() {
            self.say(&format!("{:>3}. {}", i + 1, describe_player(player)))
                .await?;
        }
        Ok(())
    }
}

fn describe_player(player: &Player) -> String {
    format!(
        "{} (level {}, {}/{} hp, {} gold, {} xp)",
        player.name,
        player.level(),
        player.health,
        player.max_health(),
        player.gold,
        player.experience
    )
}

fn describe_item(item: &Item) -> String {
    let mut stats = Vec::new();
    if item.attack > 0 {
        stats.push(format!("+{} atk", item.attack));
    }
    if item.defense > 0 {
        stats.push(format!("+{} def", item.defense));
    }
    if item.heal > 0 {
        stats.push(format!("heals {}", item.heal));
    }
    stats.push(format!("{} gold", item.value));
    format!("{} [{}] {}", item.name, item.kind, stats.join(", "))
}

fn describe_entry(entry: &InventoryEntry) -> String {
    let equipped = if entry.equipped { " (equipped)" } else { "" };
    format!("{} x{}{}", describe_item(&entry.item), entry.quantity, equipped)
}

fn describe_monster(monster: &Monster) -> String {
    format!(
        "{} ({} hp, {} atk, {} def)",
        monster.name, monster.health, monster.attack, monster.defense
    )
}
