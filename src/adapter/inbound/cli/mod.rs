//! CLI module graph.

pub mod command;
pub mod migrate;
pub mod report;
pub mod serve;

use command::{Cli, Commands};

use crate::error::Result;

/// Run the parsed command line.
///
/// # Errors
/// Returns whatever the selected command fails with.
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve(args) => serve::execute(&args).await,
        Commands::Migrate(args) => migrate::execute(&args),
        Commands::Report(args) => report::execute(&args),
    }
}
