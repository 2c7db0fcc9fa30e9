use anyhow::Result;
use clap::Parser;
use pipexec::cli::Cli;
use tracing::error;

fn main() -> Result<()> {
    // Initialize tracing with environment-based filtering
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.execute() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(e) => {
            error!("Command execution failed: {:?}", e);
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
