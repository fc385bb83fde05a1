use clap::{Arg, Command};

pub fn agent_command() -> Command {
    Command::new("agent")
        .about("Start and interact with agent PTY sessions")
        .subcommand_required(true)
        .subcommand(
            Command::new("run")
                .about("Spawn an assistant in its worktree and relay stdin/stdout until it exits")
                .arg(Arg::new("workspace-id").long("workspace-id").required(true))
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("branch").long("branch").required(true))
                .arg(Arg::new("repo").long("repo").required(true))
                .arg(Arg::new("root").long("root").required(true))
                .arg(Arg::new("base").long("base").required(true))
                .arg(Arg::new("assistant").long("assistant").required(true))
                .arg(Arg::new("resume-id").long("resume-id")),
        )
}
