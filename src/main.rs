use clap::Parser;
use orderdesk::adapter::inbound::cli::{self, command::Cli};
use tracing::error;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = cli::execute(cli).await {
        error!(error = %e, "Fatal error");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
