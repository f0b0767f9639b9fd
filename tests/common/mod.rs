//! Helpers for integration tests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::TempDir;

use product_catalog::config::DatabaseConfig;
use product_catalog::db::{DbPool, establish_connection_pool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    path: PathBuf,
    pool: Option<DbPool>,
    _dir: TempDir,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir.");
        let path = dir.path().join(filename);

        let mut config = DatabaseConfig::new(path.to_string_lossy());
        config.pool_size = 1;
        config.max_overflow = 3;
        config.pool_timeout = Duration::from_secs(5);

        let pool =
            establish_connection_pool(&config).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");

        TestDb {
            path,
            pool: Some(pool),
            _dir: dir,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone().expect("pool is alive until drop")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // Close pooled connections before removing the files.
        self.pool.take();
        let filename = self.path.to_string_lossy().into_owned();
        std::fs::remove_file(&self.path).ok();
        std::fs::remove_file(format!("{filename}-shm")).ok();
        std::fs::remove_file(format!("{filename}-wal")).ok();
    }
}
