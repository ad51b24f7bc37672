use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;
use diesel::QueryResult;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Per-connection SQLite settings applied whenever the pool hands out a new connection
#[derive(Debug, Clone, Copy)]
pub struct ConnectionOptions {
    /// Whether to enforce foreign key constraints
    pub enable_foreign_keys: bool,
    /// How long to wait on a locked database before failing
    pub busy_timeout: Option<Duration>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            enable_foreign_keys: true,
            busy_timeout: Some(Duration::from_secs(5)),
        }
    }
}

impl ConnectionOptions {
    fn apply(&self, conn: &mut SqliteConnection) -> QueryResult<()> {
        // SQLite ships with foreign keys off, and the setting is per connection
        if self.enable_foreign_keys {
            conn.batch_execute("PRAGMA foreign_keys = ON;")?;
        }
        if let Some(timeout) = self.busy_timeout {
            conn.batch_execute(&format!("PRAGMA busy_timeout = {};", timeout.as_millis()))?;
        }
        Ok(())
    }
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        self.apply(conn).map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Opens the connection pool for the given database URL
///
/// The pool is created once at startup and passed to handlers through the
/// application state; it is closed when the last handle is dropped.
pub fn init_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .connection_customizer(Box::new(ConnectionOptions::default()))
        .build(manager)?;
    Ok(pool)
}
