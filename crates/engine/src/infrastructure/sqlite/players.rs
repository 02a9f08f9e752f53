//! SQLite player repository.

use async_trait::async_trait;
use delver_domain::{Player, PlayerId, PlayerName};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Sqlite, SqlitePool};

use super::rows::{
    contains_pattern, get_id, get_string, get_timestamp, get_u32, map_db_error, name_key,
};
use crate::infrastructure::ports::{PlayerRepo, RepoError};

const SELECT_PLAYER: &str =
    "SELECT id, name, experience, health, gold, created_at FROM players";

pub struct SqlitePlayerRepo {
    pool: SqlitePool,
}

impl SqlitePlayerRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_player(row: &SqliteRow) -> Result<Player, RepoError> {
    let name = PlayerName::new(get_string(row, "name")?).map_err(RepoError::serialization)?;
    Ok(Player {
        id: get_id(row, "id")?,
        name,
        experience: get_u32(row, "experience")?,
        health: get_u32(row, "health")?,
        gold: get_u32(row, "gold")?,
        created_at: get_timestamp(row, "created_at")?,
    })
}

/// Insert or update a player on any executor (pool or open transaction).
pub(super) async fn upsert_player<'e, E>(executor: E, player: &Player) -> Result<(), RepoError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO players (id, name, name_key, experience, health, gold, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            name_key = excluded.name_key,
            experience = excluded.experience,
            health = excluded.health,
            gold = excluded.gold
        "#,
    )
    .bind(player.id.to_string())
    .bind(player.name.as_str())
    .bind(name_key(player.name.as_str()))
    .bind(i64::from(player.experience))
    .bind(i64::from(player.health))
    .bind(i64::from(player.gold))
    .bind(player.created_at.to_rfc3339())
    .execute(executor)
    .await
    .map_err(|e| map_db_error("save_player", e))?;
    Ok(())
}

#[async_trait]
impl PlayerRepo for SqlitePlayerRepo {
    async fn get(&self, id: PlayerId) -> Result<Option<Player>, RepoError> {
        let sql = format!("{SELECT_PLAYER} WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("get_player", e))?;
        row.as_ref().map(row_to_player).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Player>, RepoError> {
        let sql = format!("{SELECT_PLAYER} WHERE name_key = ?");
        let row = sqlx::query(&sql)
            .bind(name_key(name))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("find_player_by_name", e))?;
        row.as_ref().map(row_to_player).transpose()
    }

    async fn list(&self) -> Result<Vec<Player>, RepoError> {
        let sql = format!("{SELECT_PLAYER} ORDER BY name_key");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("list_players", e))?;
        rows.iter().map(row_to_player).collect()
    }

    async fn search(&self, query: &str) -> Result<Vec<Player>, RepoError> {
        let sql = format!("{SELECT_PLAYER} WHERE name_key LIKE ? ESCAPE '\\' ORDER BY name_key");
        let rows = sqlx::query(&sql)
            .bind(contains_pattern(query))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("search_players", e))?;
        rows.iter().map(row_to_player).collect()
    }

    async fn save(&self, player: &Player) -> Result<(), RepoError> {
        upsert_player(&self.pool, player).await
    }

    async fn delete(&self, id: PlayerId) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM players WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("delete_player", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn leaderboard(&self, limit: u32) -> Result<Vec<Player>, RepoError> {
        let sql = format!("{SELECT_PLAYER} ORDER BY experience DESC, name_key LIMIT ?");
        let rows = sqlx::query(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("leaderboard", e))?;
        rows.iter().map(row_to_player).collect()
    }
}
