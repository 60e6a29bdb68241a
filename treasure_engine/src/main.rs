use anyhow::Result;
use clap::Parser;
use treasure_engine::cli::{run, Args};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr, `RUST_LOG` overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    run(&args)?;

    Ok(())
}
