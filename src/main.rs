use clap::Parser;
use tracing::error;

use job_tracker::cli::{self, Cli, Command};
use job_tracker::config::Config;
use job_tracker::logging;

#[actix_web::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    // The server logs requests at info; one-shot commands stay quiet unless something goes wrong
    let default_filter = match cli.command {
        Command::Serve { .. } => "info",
        _ => "warn",
    };
    if let Err(e) = logging::init(&config.log_dir, default_filter) {
        eprintln!("Failed to initialize logging in {}: {}", config.log_dir, e);
        std::process::exit(2);
    }

    if let Err(e) = cli::run(cli, config).await {
        error!("Command failed: {}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
