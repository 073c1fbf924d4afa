//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations, DbPool};
use crate::adapter::outbound::sqlite::{
    SqliteMenuCatalog, SqliteOrderLedger, SqliteOrderSource, SqliteReportStore,
};
use crate::application::service::Service;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Open the configured database and bring its schema up to date.
///
/// # Errors
/// Returns an error if the pool cannot be created or a migration fails.
pub fn open_database(config: &Config) -> Result<DbPool> {
    let pool = create_pool(&config.database.path, config.effective_pool_size())?;
    run_migrations(&pool)?;
    info!(
        path = %config.database.path,
        pool_size = config.effective_pool_size(),
        "Database ready"
    );
    Ok(pool)
}

/// Wire every port to its SQLite adapter over one shared pool.
#[must_use]
pub fn sqlite_service(pool: &DbPool) -> Service {
    Service::new(
        Arc::new(SqliteReportStore::new(pool.clone())),
        Arc::new(SqliteOrderSource::new(pool.clone())),
        Arc::new(SqliteMenuCatalog::new(pool.clone())),
        Arc::new(SqliteOrderLedger::new(pool.clone())),
    )
}

/// Open the database and build the service.
///
/// # Errors
/// Returns an error if the database cannot be opened.
pub fn build_service(config: &Config) -> Result<Arc<Service>> {
    let pool = open_database(config)?;
    Ok(Arc::new(sqlite_service(&pool)))
}
