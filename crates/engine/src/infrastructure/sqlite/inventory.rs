//! SQLite inventory repository.

use async_trait::async_trait;
use delver_domain::{InventoryEntry, ItemId, PlayerId};
use delver_domain::Player;
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};

use super::items::row_to_item;
use super::players::upsert_player;
use super::rows::{get_bool, get_u32, map_db_error};
use crate::infrastructure::ports::{InventoryRepo, RepoError};

/// Largest stack a single inventory row may hold
const MAX_STACK: i64 = u32::MAX as i64;

pub struct SqliteInventoryRepo {
    pool: SqlitePool,
}

impl SqliteInventoryRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn entry_id(player_id: PlayerId, item_id: ItemId) -> String {
    format!("{player_id}/{item_id}")
}

/// Add `quantity` of an item to a player's inventory, stacking onto any
/// existing row. `equipped` only applies when the row is new. A stack that
/// would pass `MAX_STACK` is left untouched and reported as a constraint
/// violation.
pub(super) async fn add_holding<'e, E>(
    executor: E,
    player_id: PlayerId,
    item_id: ItemId,
    quantity: u32,
    equipped: bool,
) -> Result<(), RepoError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO inventory (player_id, item_id, quantity, equipped)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(player_id, item_id) DO UPDATE SET
            quantity = quantity + excluded.quantity
        WHERE quantity + excluded.quantity <= ?
        "#,
    )
    .bind(player_id.to_string())
    .bind(item_id.to_string())
    .bind(i64::from(quantity))
    .bind(i64::from(equipped))
    .bind(MAX_STACK)
    .execute(executor)
    .await
    .map_err(|e| map_db_error("add_inventory", e))?;

    if result.rows_affected() == 0 {
        return Err(RepoError::constraint(format!(
            "Cannot carry more than {MAX_STACK} of one item"
        )));
    }
    Ok(())
}

/// Take `quantity` of an item out of a player's inventory on an open
/// connection, deleting the row when nothing is left.
async fn take_holding(
    conn: &mut SqliteConnection,
    player_id: PlayerId,
    item_id: ItemId,
    quantity: u32,
) -> Result<(), RepoError> {
    let held: Option<i64> = sqlx::query_scalar(
        "SELECT quantity FROM inventory WHERE player_id = ? AND item_id = ?",
    )
    .bind(player_id.to_string())
    .bind(item_id.to_string())
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| map_db_error("remove_inventory", e))?;

    let Some(held) = held else {
        return Err(RepoError::not_found(
            "InventoryEntry",
            entry_id(player_id, item_id),
        ));
    };

    if held <= i64::from(quantity) {
        sqlx::query("DELETE FROM inventory WHERE player_id = ? AND item_id = ?")
            .bind(player_id.to_string())
            .bind(item_id.to_string())
            .execute(&mut *conn)
            .await
            .map_err(|e| map_db_error("remove_inventory", e))?;
    } else {
        sqlx::query("UPDATE inventory SET quantity = ? WHERE player_id = ? AND item_id = ?")
            .bind(held - i64::from(quantity))
            .bind(player_id.to_string())
            .bind(item_id.to_string())
            .execute(&mut *conn)
            .await
            .map_err(|e| map_db_error("remove_inventory", e))?;
    }
    Ok(())
}

#[async_trait]
impl InventoryRepo for SqliteInventoryRepo {
    async fn list_for_player(&self, player_id: PlayerId) -> Result<Vec<InventoryEntry>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT i.id, i.name, i.kind, i.attack, i.defense, i.heal, i.value,
                   inv.quantity, inv.equipped
            FROM inventory inv
            JOIN items i ON i.id = inv.item_id
            WHERE inv.player_id = ?
            ORDER BY i.name
            "#,
        )
        .bind(player_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("list_inventory", e))?;

        rows.iter()
            .map(|row| {
                Ok(InventoryEntry {
                    item: row_to_item(row)?,
                    quantity: get_u32(row, "quantity")?,
                    equipped: get_bool(row, "equipped")?,
                })
            })
            .collect()
    }

    async fn add(
        &self,
        player_id: PlayerId,
        item_id: ItemId,
        quantity: u32,
    ) -> Result<(), RepoError> {
        if quantity == 0 {
            return Ok(());
        }
        add_holding(&self.pool, player_id, item_id, quantity, false).await
    }

    async fn remove(
        &self,
        player_id: PlayerId,
        item_id: ItemId,
        quantity: u32,
    ) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_db_error("remove_inventory", e))?;

        take_holding(&mut tx, player_id, item_id, quantity).await?;

        tx.commit()
            .await
            .map_err(|e| map_db_error("remove_inventory", e))
    }

    async fn consume(&self, player: &Player, item_id: ItemId) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_db_error("consume_item", e))?;

        take_holding(&mut tx, player.id, item_id, 1).await?;
        upsert_player(&mut *tx, player).await?;

        tx.commit()
            .await
            .map_err(|e| map_db_error("consume_item", e))
    }

    async fn set_equipped(
        &self,
        player_id: PlayerId,
        item_id: ItemId,
        equipped: bool,
    ) -> Result<(), RepoError> {
        let result = sqlx::query(
            "UPDATE inventory SET equipped = ? WHERE player_id = ? AND item_id = ?",
        )
        .bind(i64::from(equipped))
        .bind(player_id.to_string())
        .bind(item_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("set_equipped", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found(
                "InventoryEntry",
                entry_id(player_id, item_id),
            ));
        }
        Ok(())
    }
}
