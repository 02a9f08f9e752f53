//! Runtime configuration read from the environment.
//!
//! `.env` files are loaded by the binary before this runs, so everything here
//! only looks at process variables.

/// Default SQLite file, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "delver.db";
/// Path value that selects a throwaway in-memory store.
pub const IN_MEMORY_DB_PATH: &str = ":memory:";
pub const DEFAULT_LEADERBOARD_SIZE: u32 = 10;

/// Where the game store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub path: String,
}

impl DatabaseConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY_DB_PATH)
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY_DB_PATH
    }

    /// sqlx connection URL. `mode=rwc` creates the file on first run.
    pub fn url(&self) -> String {
        if self.is_in_memory() {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite:{}?mode=rwc", self.path)
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_PATH)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    /// How many players the leaderboard shows
    pub leaderboard_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
        }
    }
}

impl AppConfig {
    /// Read `DELVER_DB_PATH` and `DELVER_LEADERBOARD_SIZE`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = lookup("DELVER_DB_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_DB_PATH.into());

        let leaderboard_size = match lookup("DELVER_LEADERBOARD_SIZE") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => {
                    tracing::warn!(
                        value = %raw,
                        "Invalid DELVER_LEADERBOARD_SIZE, using default {}",
                        DEFAULT_LEADERBOARD_SIZE
                    );
                    DEFAULT_LEADERBOARD_SIZE
                }
            },
            None => DEFAULT_LEADERBOARD_SIZE,
        };

        Self {
            database: DatabaseConfig::new(db_path),
            leaderboard_size,
        }
    }
}
