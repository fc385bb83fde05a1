use clap::{Arg, Command};

pub fn config_command() -> Command {
    Command::new("config")
        .about("Inspect and edit config.json")
        .subcommand_required(true)
        .subcommand(Command::new("show").about("Print the effective config as JSON"))
        .subcommand(
            Command::new("set-default-assistant")
                .about("Set the default assistant id")
                .arg(Arg::new("id").required(true)),
        )
}

pub fn assistants_command() -> Command {
    Command::new("assistants").about("List known assistant ids").subcommand_required(true).subcommand(
        Command::new("list").about("Print assistant ids in priority order"),
    )
}
