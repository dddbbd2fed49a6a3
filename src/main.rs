use anyhow::Result;
use clap::Parser;
use sb2gs::cli::Args;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();
    let args = Args::parse();
    sb2gs::run_cli(&args)
}
