use clap::Command;

pub fn linear_command() -> Command {
    Command::new("linear")
        .about("Refresh and print issues from configured Linear accounts")
        .subcommand_required(true)
        .subcommand(Command::new("issues").about("Fetch, filter, sort, and print this user's issues"))
}
