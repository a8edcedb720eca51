use clap::Parser;
use std::fmt::Debug;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use ttms_cli::{Command, Runner};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Session-check endpoint (overrides the config file)
    #[arg(long)]
    validation_endpoint: Option<String>,
    /// Entity data endpoint (overrides the config file)
    #[arg(long)]
    data_endpoint: Option<String>,
    /// Directory holding config.json, storage.json and cookies.json
    #[arg(long)]
    state_dir: Option<PathBuf>,
    /// Debug print
    #[arg(short, long)]
    debug: bool,
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.debug { "debug" } else { "warn" }));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    Ok(Runner::new(args.state_dir, args.validation_endpoint, args.data_endpoint, args.debug)
        .await?
        .run(args.command)
        .await?)
}
