use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use outbreak::manager::Manager;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    #[arg(long)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Run,

    Analyze {
        #[arg(long, default_value_t = 16)]
        n_runs: usize,
    },
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mgr = Manager::new(&args.config).context("failed to construct mgr")?;

    let output = match args.command {
        Command::Run => {
            let summary = mgr.run_simulation().context("failed to run simulation")?;
            toml::to_string(&summary).context("failed to serialize summary")?
        }
        Command::Analyze { n_runs } => {
            let summary = mgr.run_analysis(n_runs).context("failed to run analysis")?;
            toml::to_string(&summary).context("failed to serialize summary")?
        }
    };
    print!("{output}");

    Ok(())
}
