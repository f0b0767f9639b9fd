//! SQLite connection pool.

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError, PooledConnection};
use diesel::sqlite::SqliteConnection;

use crate::config::DatabaseConfig;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

diesel::define_sql_function! {
    /// Unicode lowercase; SQLite's built-in `lower()` and `LIKE` only fold ASCII.
    fn unicode_lower(value: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// Applies per-connection pragmas and registers `unicode_lower` every time
/// r2d2 opens a connection.
#[derive(Debug)]
struct SqlitePragmas {
    busy_timeout_ms: u128,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;",
            self.busy_timeout_ms
        ))
        .map_err(diesel::r2d2::Error::QueryError)?;

        unicode_lower_utils::register_impl(conn, |value: String| value.to_lowercase())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Build the bounded connection pool described by `config`.
///
/// Connections are validated on checkout and recycled after
/// `pool_recycle`; checkout waits at most `pool_timeout`.
pub fn establish_connection_pool(config: &DatabaseConfig) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(&config.url);

    Pool::builder()
        .max_size(config.pool_size + config.max_overflow)
        .min_idle(Some(config.pool_size))
        .connection_timeout(config.pool_timeout)
        .max_lifetime(Some(config.pool_recycle))
        .test_on_check_out(true)
        .connection_customizer(Box::new(SqlitePragmas {
            busy_timeout_ms: config.busy_timeout.as_millis(),
        }))
        .build(manager)
}
