use clap::ArgMatches;
use tracing::info;

use amux_agents::AssistantRegistry;
use amux_config::{load_config, save_config};
use amux_paths::Paths;

pub fn handle_config_command(matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("show", _)) => show(),
        Some(("set-default-assistant", sub)) => {
            let id = sub.get_one::<String>("id").expect("required");
            set_default_assistant(id)
        }
        _ => unreachable!("clap enforces subcommand_required"),
    }
}

fn show() -> anyhow::Result<()> {
    let paths = Paths::resolve()?;
    let config = load_config(&paths)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn set_default_assistant(id: &str) -> anyhow::Result<()> {
    let paths = Paths::resolve()?;
    paths.ensure_directories()?;
    let mut config = load_config(&paths)?;
    config.default_assistant = Some(id.to_string());
    save_config(&paths, &config)?;
    info!(event = "cli.config.default_assistant_set", id = id);
    println!("default assistant set to '{id}'");
    Ok(())
}

pub fn handle_assistants_command(matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("list", _)) => list(),
        _ => unreachable!("clap enforces subcommand_required"),
    }
}

fn list() -> anyhow::Result<()> {
    let paths = Paths::resolve()?;
    let config = load_config(&paths)?;
    let registry = AssistantRegistry::from_config(&config);
    println!("default: {}", registry.resolved_default_assistant());
    for name in registry.assistant_names() {
        println!("{name}");
    }
    Ok(())
}
