//! Application composition.
//!
//! Builds the object graph in a fixed order (context, seed, engine, menu),
//! runs the menu, and always closes the context afterwards.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::game::GameEngine;
use crate::infrastructure::{
    clock::{SystemClock, SystemRandom},
    config::AppConfig,
    ports::{ClockPort, DataContext, RandomPort, RepoError},
    sqlite::SqliteGameContext,
};
use crate::menu::{Menu, MenuError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to open game store: {0}")]
    Open(#[source] RepoError),

    #[error("Failed to seed game store: {0}")]
    Seed(#[source] RepoError),

    #[error("Menu session failed: {0}")]
    Session(#[from] MenuError),
}

/// Open the configured SQLite store and run a session against it.
///
/// Nothing is written to `output` if the store cannot be opened.
pub async fn run<R, W>(config: &AppConfig, input: R, output: W) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let context = SqliteGameContext::open(&config.database, clock)
        .await
        .map_err(AppError::Open)?;

    run_with(context, config, input, output).await
}

/// Run a session against an already acquired context, taking ownership of
/// it. The context is closed exactly once whether the session succeeds or
/// fails.
pub async fn run_with<C, R, W>(
    context: C,
    config: &AppConfig,
    input: R,
    output: W,
) -> Result<(), AppError>
where
    C: DataContext,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let result = session(&context, config, input, output).await;
    context.close().await;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Session ended with an error");
    }
    result
}

async fn session<R, W>(
    context: &dyn DataContext,
    config: &AppConfig,
    input: R,
    output: W,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    context.seed().await.map_err(AppError::Seed)?;

    let random: Arc<dyn RandomPort> = Arc::new(SystemRandom::new());
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let engine = GameEngine::new(context, random, clock);

    let mut menu =
        Menu::new(&engine, input, output).with_leaderboard_size(config.leaderboard_size);
    menu.show().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::{Context, Poll};

    use async_trait::async_trait;

    use super::*;
    use crate::game::test_support::MockContext;
    use crate::infrastructure::config::DatabaseConfig;
    use crate::infrastructure::ports::{
        InventoryRepo, ItemRepo, MonsterRepo, PlayerRepo, SeedReport,
    };

    /// Records lifecycle calls. Repositories are unused mocks: any engine
    /// call would panic on a missing expectation.
    struct RecordingContext {
        inner: MockContext,
        seeds: Arc<AtomicUsize>,
        closes: Arc<AtomicUsize>,
        fail_seed: bool,
    }

    impl RecordingContext {
        fn new(fail_seed: bool) -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>) {
            let seeds = Arc::new(AtomicUsize::new(0));
            let closes = Arc::new(AtomicUsize::new(0));
            let ctx = Self {
                inner: MockContext::new(),
                seeds: seeds.clone(),
                closes: closes.clone(),
                fail_seed,
            };
            (ctx, seeds, closes)
        }
    }

    #[async_trait]
    impl DataContext for RecordingContext {
        fn players(&self) -> &dyn PlayerRepo {
            &self.inner.players
        }

        fn items(&self) -> &dyn ItemRepo {
            &self.inner.items
        }

        fn monsters(&self) -> &dyn MonsterRepo {
            &self.inner.monsters
        }

        fn inventory(&self) -> &dyn InventoryRepo {
            &self.inner.inventory
        }

        async fn seed(&self) -> Result<SeedReport, RepoError> {
            self.seeds.fetch_add(1, Ordering::SeqCst);
            if self.fail_seed {
                return Err(RepoError::database("seed", "disk full"));
            }
            Ok(SeedReport::default())
        }

        async fn close(&self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Output that refuses every write
    struct BrokenPipe;

    impl AsyncWrite for BrokenPipe {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            Poll::Ready(Err(std::io::ErrorKind::BrokenPipe.into()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    fn memory_config() -> AppConfig {
        AppConfig {
            database: DatabaseConfig::in_memory(),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn successful_session_seeds_and_closes_once() {
        let (ctx, seeds, closes) = RecordingContext::new(false);
        let mut out = Vec::new();

        run_with(ctx, &memory_config(), &b"0\n"[..], &mut out)
            .await
            .expect("session");

        assert_eq!(seeds.load(Ordering::SeqCst), 1);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        let out = String::from_utf8(out).expect("utf8");
        assert!(out.contains("Goodbye!"));
    }

    #[tokio::test]
    async fn seed_failure_closes_and_never_shows_the_menu() {
        let (ctx, seeds, closes) = RecordingContext::new(true);
        let mut out = Vec::new();

        let err = run_with(ctx, &memory_config(), &b"0\n"[..], &mut out)
            .await
            .expect_err("seed fails");

        assert!(matches!(err, AppError::Seed(_)));
        assert_eq!(seeds.load(Ordering::SeqCst), 1);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn menu_io_failure_still_closes() {
        let (ctx, _seeds, closes) = RecordingContext::new(false);

        let err = run_with(ctx, &memory_config(), &b"0\n"[..], BrokenPipe)
            .await
            .expect_err("writes fail");

        assert!(matches!(err, AppError::Session(MenuError::Io(_))));
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn open_failure_writes_nothing() {
        let dir = tempfile::tempdir().expect("temp dir");
        // mode=rwc creates the file but not its parent directories.
        let path = dir.path().join("missing").join("delver.db");
        let config = AppConfig {
            database: DatabaseConfig::new(path.to_string_lossy().to_string()),
            ..AppConfig::default()
        };
        let mut out = Vec::new();

        let err = run(&config, &b"0\n"[..], &mut out)
            .await
            .expect_err("open fails");

        assert!(matches!(err, AppError::Open(_)));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn end_to_end_on_an_empty_store() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("delver.db");
        let config = AppConfig {
            database: DatabaseConfig::new(path.to_string_lossy().to_string()),
            ..AppConfig::default()
        };

        let mut out = Vec::new();
        run(&config, &b"1\n0\n"[..], &mut out)
            .await
            .expect("first run");
        let first = String::from_utf8(out).expect("utf8");
        assert!(first.contains("1. Adventurer"));

        // Second run reuses the file and must not seed again.
        let mut out = Vec::new();
        run(&config, &b"1\n0\n"[..], &mut out)
            .await
            .expect("second run");
        let second = String::from_utf8(out).expect("utf8");
        assert!(second.contains("1. Adventurer"));
        assert!(!second.contains("2. "));
    }
}
