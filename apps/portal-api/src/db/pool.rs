use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;

use crate::config::Config;

pub type DbPool = Pool<AsyncPgConnection>;

/// Create a Diesel async connection pool sized from the config.
pub async fn connect(config: &Config) -> DbPool {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
    let pool = Pool::builder(manager)
        .max_size(config.db_max_connections)
        .build()
        .expect("failed to build connection pool");

    tracing::info!(max_size = config.db_max_connections, "database pool created");

    pool
}
