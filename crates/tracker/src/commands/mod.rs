pub mod contests;
pub mod leaderboard;
pub mod migrate;
pub mod refresh;
pub mod serve;
pub mod users;

use std::sync::Arc;

use anyhow::{Context, Result};
use importer::{CodeforcesClient, ResultsSynchronizer};
use storage::Database;
use tracing::info;

use crate::config::Config;

/// Connected resources shared by every subcommand.
pub struct App {
    pub config: Config,
    pub db: Arc<Database>,
    pub provider: Arc<CodeforcesClient>,
}

impl App {
    /// Connect to the database and bring its schema up to date.
    pub async fn connect(config: Config) -> Result<Self> {
        info!("Connecting to database at: {}", config.database_host());
        let db = Database::with_max_connections(&config.database_url, config.database_max_connections)
            .await
            .context("Failed to initialize database")?;

        db.run_migrations()
            .await
            .context("Failed to run migrations")?;

        let provider = CodeforcesClient::with_config(&config.codeforces_api_url, config.fetch_timeout)
            .context("Failed to build Codeforces client")?;

        Ok(Self {
            config,
            db: Arc::new(db),
            provider: Arc::new(provider),
        })
    }

    pub fn synchronizer(&self) -> ResultsSynchronizer<Database, CodeforcesClient> {
        ResultsSynchronizer::new(
            self.db.clone(),
            self.provider.clone(),
            self.config.sync_settings(),
        )
    }
}
