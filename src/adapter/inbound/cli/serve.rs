//! Handler for the `serve` command.

use tokio::signal;
use tracing::info;

use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::adapter::inbound::server::Server;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_service;
use crate::infrastructure::config::settings::Config;

/// Execute the serve command: listen until Ctrl-C.
///
/// # Errors
/// Returns an error if configuration, the database, or the listener fails.
pub async fn execute(args: &ConfigPathArg) -> Result<()> {
    let config = Config::load_or_default(args.config.as_ref())?;
    config.init_logging();
    info!("orderdesk starting");

    let service = build_service(&config)?;
    let server = Server::bind(config.bind_addr()?, service).await?;

    tokio::select! {
        result = server.run() => result?,
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("orderdesk stopped");
    Ok(())
}
