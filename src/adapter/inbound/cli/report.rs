//! Handler for the `report` command.

use crate::adapter::inbound::cli::command::ReportArgs;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_service;
use crate::infrastructure::config::settings::Config;

/// Execute the report command, printing the materialized report as JSON.
///
/// # Errors
/// Returns an error for a malformed period or a database failure.
pub fn execute(args: &ReportArgs) -> Result<()> {
    let key = args.kind.key()?;
    let config = Config::load_or_default(args.config.config.as_ref())?;
    config.init_logging();

    let service = build_service(&config)?;
    let materialized = service.reports().materialize(&key, args.refresh)?;
    println!("{}", serde_json::to_string_pretty(&materialized)?);
    Ok(())
}
