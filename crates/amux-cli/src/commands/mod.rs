mod agent;
mod config;
mod init;
mod linear;
mod metadata;

use clap::ArgMatches;
use tracing::error;

pub fn run_command(matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("init", _)) => init::handle_init_command(),
        Some(("config", sub)) => config::handle_config_command(sub),
        Some(("assistants", sub)) => config::handle_assistants_command(sub),
        Some(("metadata", sub)) => metadata::handle_metadata_command(sub),
        Some(("agent", sub)) => agent::handle_agent_command(sub),
        Some(("linear", sub)) => linear::handle_linear_command(sub),
        _ => {
            error!(event = "cli.command_unknown");
            anyhow::bail!("unknown command")
        }
    }
}
