use anyhow::Result;
use clap::Parser;
use env_logger::Env;

mod cli_bin;

use cli_bin::args::{Cli, Commands};
use cli_bin::commands::{fields_command, query_command, show_command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Query(args) => query_command(args)?,
        Commands::Show(args) => show_command(args)?,
        Commands::Fields(args) => fields_command(args)?,
    }
    Ok(())
}

/// RUST_LOG wins over the verbosity flags when set
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
