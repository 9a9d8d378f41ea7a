//! Database migration command.

use licensehub_core::error::AppError;
use licensehub_database::DatabasePool;
use licensehub_database::migration::run_migrations;

use crate::output;

/// Apply pending migrations to the configured database
pub async fn execute(config_env: &str) -> Result<(), AppError> {
    let config = super::load_config(config_env)?;
    if config.database.is_memory() {
        output::print_warning("database.url is 'memory'; nothing to migrate");
        return Ok(());
    }

    let pool = DatabasePool::connect(&config.database).await?;
    let result = run_migrations(pool.pool()).await;
    pool.close().await;
    result?;

    output::print_success("Migrations applied");
    Ok(())
}
