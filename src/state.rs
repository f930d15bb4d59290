use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::Config;
use crate::repositories::EnvironmentRepository;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// SeaORM database connection
    pub db: DatabaseConnection,
    pub config: Config,
}

impl AppState {
    /// Create a new AppState: open the database, run migrations and seed demo data
    pub async fn new(config: Config) -> Result<Self, AppStateError> {
        if let Some(dir) = config.database_dir() {
            std::fs::create_dir_all(&dir)
                .map_err(|e| AppStateError::DataDir(format!("{}: {}", dir.display(), e)))?;
        }

        // An in-memory SQLite database lives only as long as its connection,
        // so the pool must never drop below one.
        let mut opt = ConnectOptions::new(&config.database_url);
        opt.max_connections(config.database_max_connections.max(1))
            .min_connections(1)
            .sqlx_logging(true);

        let db = Database::connect(opt)
            .await
            .map_err(|e| AppStateError::Sqlite(e.to_string()))?;

        // Run migrations on the pool SeaORM already holds
        sqlx::migrate!("./migrations")
            .run(db.get_sqlite_connection_pool())
            .await
            .map_err(|e| AppStateError::Migration(e.to_string()))?;

        if config.seed_demo_data {
            EnvironmentRepository::seed_if_empty(&db)
                .await
                .map_err(|e| AppStateError::Seed(e.to_string()))?;
        }

        Ok(Self { db, config })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("Data directory error: {0}")]
    DataDir(String),

    #[error("SQLite connection error: {0}")]
    Sqlite(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Seed error: {0}")]
    Seed(String),
}
