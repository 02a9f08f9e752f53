//! SQLite monster repository.

use async_trait::async_trait;
use delver_domain::{Monster, MonsterId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Sqlite, SqlitePool};

use super::rows::{get_id, get_string, get_u32, map_db_error};
use crate::infrastructure::ports::{MonsterRepo, RepoError};

const SELECT_MONSTER: &str = "SELECT id, name, health, attack, defense, experience_reward, gold_reward FROM monsters";

pub struct SqliteMonsterRepo {
    pool: SqlitePool,
}

impl SqliteMonsterRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_monster(row: &SqliteRow) -> Result<Monster, RepoError> {
    Ok(Monster {
        id: get_id(row, "id")?,
        name: get_string(row, "name")?,
        health: get_u32(row, "health")?,
        attack: get_u32(row, "attack")?,
        defense: get_u32(row, "defense")?,
        experience_reward: get_u32(row, "experience_reward")?,
        gold_reward: get_u32(row, "gold_reward")?,
    })
}

pub(super) async fn insert_monster<'e, E>(executor: E, monster: &Monster) -> Result<(), RepoError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO monsters (id, name, health, attack, defense, experience_reward, gold_reward)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(monster.id.to_string())
    .bind(&monster.name)
    .bind(i64::from(monster.health))
    .bind(i64::from(monster.attack))
    .bind(i64::from(monster.defense))
    .bind(i64::from(monster.experience_reward))
    .bind(i64::from(monster.gold_reward))
    .execute(executor)
    .await
    .map_err(|e| map_db_error("insert_monster", e))?;
    Ok(())
}

#[async_trait]
impl MonsterRepo for SqliteMonsterRepo {
    async fn get(&self, id: MonsterId) -> Result<Option<Monster>, RepoError> {
        let sql = format!("{SELECT_MONSTER} WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("get_monster", e))?;
        row.as_ref().map(row_to_monster).transpose()
    }

    async fn list(&self) -> Result<Vec<Monster>, RepoError> {
        let sql = format!("{SELECT_MONSTER} ORDER BY experience_reward, name");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("list_monsters", e))?;
        rows.iter().map(row_to_monster).collect()
    }
}
