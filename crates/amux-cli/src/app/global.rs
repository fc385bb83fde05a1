use clap::{Arg, ArgAction, Command};

pub fn root_command() -> Command {
    Command::new("amux")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Multiplex AI coding agents across Git worktrees")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .help("Emit structured JSON logs instead of compact text")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
}
