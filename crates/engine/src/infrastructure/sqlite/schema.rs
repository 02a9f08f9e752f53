//! Table definitions. Every statement is idempotent and runs on open.

use sqlx::SqlitePool;

use super::rows::map_db_error;
use crate::infrastructure::ports::RepoError;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS players (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        name_key TEXT NOT NULL,
        experience INTEGER NOT NULL DEFAULT 0,
        health INTEGER NOT NULL,
        gold INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_players_name_key ON players(name_key)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_players_experience ON players(experience DESC, name_key)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS items (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        kind TEXT NOT NULL,
        attack INTEGER NOT NULL DEFAULT 0,
        defense INTEGER NOT NULL DEFAULT 0,
        heal INTEGER NOT NULL DEFAULT 0,
        value INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS monsters (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        health INTEGER NOT NULL,
        attack INTEGER NOT NULL,
        defense INTEGER NOT NULL,
        experience_reward INTEGER NOT NULL DEFAULT 0,
        gold_reward INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS inventory (
        player_id TEXT NOT NULL REFERENCES players(id) ON DELETE CASCADE,
        item_id TEXT NOT NULL REFERENCES items(id) ON DELETE CASCADE,
        quantity INTEGER NOT NULL CHECK (quantity > 0),
        equipped INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (player_id, item_id)
    )
    "#,
];

pub(super) async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    for statement in STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| map_db_error("schema", e))?;
    }
    Ok(())
}
