//! The SQLite-backed game context.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use super::inventory::SqliteInventoryRepo;
use super::items::SqliteItemRepo;
use super::monsters::SqliteMonsterRepo;
use super::players::SqlitePlayerRepo;
use super::rows::map_db_error;
use super::schema::ensure_schema;
use super::seed::{self, SeedData};
use crate::infrastructure::config::DatabaseConfig;
use crate::infrastructure::ports::{
    ClockPort, DataContext, InventoryRepo, ItemRepo, MonsterRepo, PlayerRepo, RepoError,
    SeedReport,
};

/// Owns the connection pool and the repositories that share it.
///
/// Acquire with [`SqliteGameContext::open`], release with
/// [`DataContext::close`]. Dropping without closing still releases the
/// connections, but without waiting for them.
pub struct SqliteGameContext {
    pub(super) pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
    players: SqlitePlayerRepo,
    items: SqliteItemRepo,
    monsters: SqliteMonsterRepo,
    inventory: SqliteInventoryRepo,
}

impl SqliteGameContext {
    /// Connect, enable foreign keys, and create any missing tables.
    pub async fn open(config: &DatabaseConfig, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let options = SqliteConnectOptions::from_str(&config.url())
            .map_err(|e| RepoError::database("open", e))?
            .foreign_keys(true);

        // An in-memory database lives and dies with its connection, so the
        // pool must hold exactly one and never recycle it.
        let pool_options = if config.is_in_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(4)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| map_db_error("open", e))?;

        ensure_schema(&pool).await?;

        tracing::info!(path = %config.path, "Opened game store");

        Ok(Self {
            players: SqlitePlayerRepo::new(pool.clone()),
            items: SqliteItemRepo::new(pool.clone()),
            monsters: SqliteMonsterRepo::new(pool.clone()),
            inventory: SqliteInventoryRepo::new(pool.clone()),
            pool,
            clock,
        })
    }

    /// Seed with a specific dataset instead of the bundled one.
    pub async fn seed_with(&self, data: &SeedData) -> Result<SeedReport, RepoError> {
        let report = seed::apply(&self.pool, data, self.clock.now()).await?;
        tracing::info!(
            seeded = report.seeded,
            players = report.players,
            items = report.items,
            monsters = report.monsters,
            "Seed complete"
        );
        Ok(report)
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

#[async_trait]
impl DataContext for SqliteGameContext {
    fn players(&self) -> &dyn PlayerRepo {
        &self.players
    }

    fn items(&self) -> &dyn ItemRepo {
        &self.items
    }

    fn monsters(&self) -> &dyn MonsterRepo {
        &self.monsters
    }

    fn inventory(&self) -> &dyn InventoryRepo {
        &self.inventory
    }

    async fn seed(&self) -> Result<SeedReport, RepoError> {
        let data = SeedData::default_dataset()?;
        self.seed_with(&data).await
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Closed game store");
    }
}
