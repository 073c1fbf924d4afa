//! Handler for the `migrate` command.

use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::error::Result;
use crate::infrastructure::bootstrap::open_database;
use crate::infrastructure::config::settings::Config;

/// Execute the migrate command.
///
/// # Errors
/// Returns an error if configuration or a migration fails.
pub fn execute(args: &ConfigPathArg) -> Result<()> {
    let config = Config::load_or_default(args.config.as_ref())?;
    config.init_logging();
    open_database(&config)?;
    println!("database {} is up to date", config.database.path);
    Ok(())
}
