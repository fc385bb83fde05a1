use std::path::PathBuf;

use chrono::Utc;
use clap::ArgMatches;
use tracing::info;

use amux_metadata::{load, save};
use amux_paths::Paths;
use amux_protocol::{Worktree, WorktreeId, WorkspaceMetadata};

pub fn handle_metadata_command(matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("show", sub)) => show(sub),
        Some(("init", sub)) => init(sub),
        _ => unreachable!("clap enforces subcommand_required"),
    }
}

fn show(matches: &ArgMatches) -> anyhow::Result<()> {
    let workspace_id = matches.get_one::<String>("workspace-id").expect("required");
    let root = matches.get_one::<String>("root").expect("has default");

    let paths = Paths::resolve()?;
    let worktree = placeholder_worktree(workspace_id, root);
    let meta = load(&paths, &worktree)?;
    println!("{}", serde_json::to_string_pretty(&meta)?);
    Ok(())
}

fn init(matches: &ArgMatches) -> anyhow::Result<()> {
    let workspace_id = matches.get_one::<String>("workspace-id").expect("required");
    let name = matches.get_one::<String>("name").expect("required");
    let branch = matches.get_one::<String>("branch").expect("required");
    let repo = matches.get_one::<String>("repo").expect("required");
    let base = matches.get_one::<String>("base").expect("required");
    let assistant = matches.get_one::<String>("assistant").expect("required");

    let paths = Paths::resolve()?;
    paths.ensure_directories()?;

    let meta = WorkspaceMetadata {
        name: name.clone(),
        branch: branch.clone(),
        repo: repo.clone(),
        base: base.clone(),
        created: Utc::now(),
        assistant: assistant.clone(),
        runtime: Default::default(),
        script: Default::default(),
        script_mode: Default::default(),
        env: Default::default(),
        port_base: None,
        last_active_buffer: None,
        open_tabs: Vec::new(),
        active_tab_index: 0,
    };

    save(&paths, workspace_id, &meta)?;
    info!(event = "cli.metadata.init_completed", workspace_id = workspace_id.as_str());
    println!("metadata seeded for workspace '{workspace_id}'");
    Ok(())
}

fn placeholder_worktree(workspace_id: &str, root: &str) -> Worktree {
    Worktree {
        id: WorktreeId::new(workspace_id),
        name: workspace_id.to_string(),
        branch: workspace_id.to_string(),
        repo: String::new(),
        root: PathBuf::from(root),
        base: "main".to_string(),
    }
}
