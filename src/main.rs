use clap::Parser;
use tracing_subscriber::EnvFilter;

use popsim_catalog::cli;

/// Default log filter for a `-v` count; `RUST_LOG` takes precedence when set
fn log_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "popsim_catalog=warn",
        1 => "popsim_catalog=info,warn",
        _ => "popsim_catalog=debug,info",
    }
}

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(cli.verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let opts = cli::GlobalOptions::from_cli(&cli);

    match cli.command {
        cli::Commands::Species(args) => cli::species::run(args, &opts)?,
        cli::Commands::Model(args) => cli::model::run(args, &opts)?,
        cli::Commands::Contig(args) => cli::contig::run(args, &opts)?,
        cli::Commands::Catalog(args) => cli::catalog::run(args, &opts)?,
        cli::Commands::Simulate(args) => cli::simulate::run(args, &opts)?,
        cli::Commands::Provenance => cli::simulate::run_provenance(&opts)?,
    }

    Ok(())
}
