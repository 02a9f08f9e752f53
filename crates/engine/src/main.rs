//! Delver - console dungeon game.

use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use delver_engine::app;
use delver_engine::infrastructure::config::AppConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root so `cargo run -p delver-engine` works from anywhere.
    load_dotenv_from_repo_root();

    // Logs go to stderr; stdout belongs to the menu.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "delver_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Delver");

    let config = AppConfig::from_env();
    tracing::info!(
        db_path = %config.database.path,
        leaderboard_size = config.leaderboard_size,
        "Configuration loaded"
    );

    let input = BufReader::new(tokio::io::stdin());
    app::run(&config, input, tokio::io::stdout()).await?;

    tracing::info!("Delver stopped");
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
