use clap::{Arg, Command};

pub fn metadata_command() -> Command {
    Command::new("metadata")
        .about("Inspect and seed the workspace metadata store")
        .subcommand_required(true)
        .subcommand(
            Command::new("show")
                .about("Print a workspace's metadata as JSON (defaults are seeded if none is stored yet)")
                .arg(Arg::new("workspace-id").required(true))
                .arg(Arg::new("root").long("root").default_value(".")),
        )
        .subcommand(
            Command::new("init")
                .about("Seed default metadata for a new workspace")
                .arg(Arg::new("workspace-id").required(true))
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("branch").long("branch").required(true))
                .arg(Arg::new("repo").long("repo").required(true))
                .arg(Arg::new("base").long("base").required(true))
                .arg(Arg::new("assistant").long("assistant").required(true)),
        )
}
