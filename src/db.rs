//! SQLite connection-pool primitives shared by the repository layer.

use diesel::SqliteConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};

/// Pool of SQLite connections handed out to request handlers.
pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
/// A single pooled connection.
pub type DbConnection = r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

/// Enables foreign key enforcement on every pooled connection.
///
/// SQLite keeps `foreign_keys` off unless the pragma is set per connection,
/// and `product_images` relies on it for cascading deletes.
#[derive(Debug, Clone, Copy)]
struct SqliteForeignKeys;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for SqliteForeignKeys {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        use diesel::prelude::*;

        diesel::sql_query("PRAGMA foreign_keys = ON;")
            .execute(conn)
            .map(|_| ())
            .map_err(r2d2::Error::QueryError)
    }
}

/// Build an r2d2 pool over the SQLite database at `database_url`.
pub fn establish_connection_pool(database_url: &str) -> Result<DbPool, r2d2::PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    r2d2::Pool::builder()
        .connection_customizer(Box::new(SqliteForeignKeys))
        .build(manager)
}
