mod agent;
mod config;
mod global;
mod linear;
mod metadata;


use clap::Command;

pub fn build_cli() -> Command {
    global::root_command()
        .subcommand(Command::new("init").about("Create the ~/.amux directory layout and run legacy migration"))
        .subcommand(config::config_command())
        .subcommand(config::assistants_command())
        .subcommand(metadata::metadata_command())
        .subcommand(agent::agent_command())
        .subcommand(linear::linear_command())
}
