use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod matching;
mod parsing;
mod pipeline;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("seq_reconcile=debug,info")
    } else {
        EnvFilter::new("seq_reconcile=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Compare(args) => {
            cli::compare::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Sheet(args) => {
            cli::sheet::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Fastq(args) => {
            cli::fastq::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
