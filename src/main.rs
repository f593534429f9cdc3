//! unmanaged-cluster CLI - resolve and persist local cluster configuration
//!
//! Usage: unmanaged-cluster <COMMAND>
//!
//! Commands:
//!   configure  Resolve the effective cluster configuration and render it
//!              to <cluster-name>.yaml in the working directory

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use log::debug;

use unmanaged_cluster::cli::{Cli, Commands, ConfigureArgs};
use unmanaged_cluster::config;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::Configure(flags) => configure(&flags),
    }
}

fn configure(flags: &ConfigureArgs) -> Result<()> {
    let args = flags.to_arg_map()?;
    let resolved = config::initialize_configuration(&args)?;
    debug!("resolved configuration for cluster '{}'", resolved.cluster_name);

    let file_name = format!("{}.yaml", resolved.cluster_name);
    config::render_config_to_file(Path::new(&file_name), &resolved)?;

    println!("wrote configuration to {file_name}");
    Ok(())
}

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .init();
}
