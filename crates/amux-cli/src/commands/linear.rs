use clap::ArgMatches;
use tracing::{info, warn};

use amux_config::load_linear_config;
use amux_linear::Service;
use amux_paths::Paths;

pub fn handle_linear_command(matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("issues", _)) => issues(),
        _ => unreachable!("clap enforces subcommand_required"),
    }
}

fn issues() -> anyhow::Result<()> {
    let paths = Paths::resolve()?;
    paths.ensure_directories()?;
    let config = load_linear_config(&paths)?;
    let scope = config.scope.clone();
    let service = Service::new(paths, config);

    if service.active_accounts().is_empty() {
        println!("no active Linear accounts configured");
        return Ok(());
    }

    info!(event = "cli.linear.refresh_started", accounts = service.active_accounts().len());
    let issues = match service.refresh_my_issues() {
        Ok(issues) => issues,
        Err(e) => {
            warn!(event = "cli.linear.refresh_failed", error = %e);
            return Err(e.into());
        }
    };

    let filtered = service.apply_scope_filters(issues, &scope);
    let sorted = service.sort_issues(filtered);

    for issue in &sorted {
        println!("{}  {}  [{}]  {}", issue.identifier, issue.title, issue.state.name, issue.account);
    }
    info!(event = "cli.linear.refresh_completed", count = sorted.len());
    Ok(())
}
