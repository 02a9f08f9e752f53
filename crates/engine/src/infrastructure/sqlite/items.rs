//! SQLite item repository.

use async_trait::async_trait;
use delver_domain::{Item, ItemId, ItemKind};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Sqlite, SqlitePool};

use super::rows::{get_id, get_string, get_u32, map_db_error};
use crate::infrastructure::ports::{ItemRepo, RepoError};

pub struct SqliteItemRepo {
    pool: SqlitePool,
}

impl SqliteItemRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Maps the item columns of a row. Shared with the inventory join, which
/// selects the same column names.
pub(super) fn row_to_item(row: &SqliteRow) -> Result<Item, RepoError> {
    let kind = get_string(row, "kind")?
        .parse::<ItemKind>()
        .unwrap_or(ItemKind::Unknown);
    Ok(Item {
        id: get_id(row, "id")?,
        name: get_string(row, "name")?,
        kind,
        attack: get_u32(row, "attack")?,
        defense: get_u32(row, "defense")?,
        heal: get_u32(row, "heal")?,
        value: get_u32(row, "value")?,
    })
}

pub(super) async fn insert_item<'e, E>(executor: E, item: &Item) -> Result<(), RepoError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO items (id, name, kind, attack, defense, heal, value)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(item.id.to_string())
    .bind(&item.name)
    .bind(item.kind.to_string())
    .bind(i64::from(item.attack))
    .bind(i64::from(item.defense))
    .bind(i64::from(item.heal))
    .bind(i64::from(item.value))
    .execute(executor)
    .await
    .map_err(|e| map_db_error("insert_item", e))?;
    Ok(())
}

#[async_trait]
impl ItemRepo for SqliteItemRepo {
    async fn get(&self, id: ItemId) -> Result<Option<Item>, RepoError> {
        let row = sqlx::query(
            "SELECT id, name, kind, attack, defense, heal, value FROM items WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("get_item", e))?;
        row.as_ref().map(row_to_item).transpose()
    }

    async fn list(&self) -> Result<Vec<Item>, RepoError> {
        let rows = sqlx::query(
            "SELECT id, name, kind, attack, defense, heal, value FROM items ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("list_items", e))?;
        rows.iter().map(row_to_item).collect()
    }
}
