use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::ArgMatches;
use tracing::{info, warn};

use amux_agents::AssistantRegistry;
use amux_config::load_config;
use amux_manager::AgentManager;
use amux_paths::Paths;
use amux_protocol::{ResumeInfo, Worktree, WorktreeId};
use amux_pty::spawn_guarded;

pub fn handle_agent_command(matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("run", sub)) => run(sub),
        _ => unreachable!("clap enforces subcommand_required"),
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let workspace_id = matches.get_one::<String>("workspace-id").expect("required");
    let name = matches.get_one::<String>("name").expect("required");
    let branch = matches.get_one::<String>("branch").expect("required");
    let repo = matches.get_one::<String>("repo").expect("required");
    let root = matches.get_one::<String>("root").expect("required");
    let base = matches.get_one::<String>("base").expect("required");
    let assistant = matches.get_one::<String>("assistant").expect("required");
    let resume_id = matches.get_one::<String>("resume-id");

    let worktree = Worktree {
        id: WorktreeId::new(workspace_id.clone()),
        name: name.clone(),
        branch: branch.clone(),
        repo: repo.clone(),
        root: PathBuf::from(root),
        base: base.clone(),
    };

    let resume = match resume_id {
        Some(id) if !id.is_empty() => ResumeInfo::Id { id: id.clone() },
        _ => ResumeInfo::None,
    };

    let paths = Paths::resolve()?;
    let config = load_config(&paths)?;
    let registry = AssistantRegistry::from_config(&config);
    let mut manager = AgentManager::new(registry);

    info!(event = "cli.agent.run_started", worktree = %worktree.id, assistant = assistant.as_str());
    let agent = manager.create_agent(&worktree, assistant, &resume)?;
    let agent_id = agent.id.clone();

    let mut reader = agent.session.try_clone_reader()?;
    let reader_handle = spawn_guarded("amux-cli-agent-reader", move || {
        let mut buf = [0u8; 4096];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    let _ = std::io::stdout().write_all(&buf[..n]);
                    let _ = std::io::stdout().flush();
                }
                Err(_) => break,
            }
        }
    });

    loop {
        let agent = manager
            .agents_for(&worktree.id)
            .iter()
            .find(|a| a.id == agent_id)
            .expect("just created");
        if !agent.is_running() {
            break;
        }
        std::thread::sleep(Duration::from_millis(100));
    }

    let _ = reader_handle.join();

    if let Err(e) = manager.close_agent(&agent_id) {
        warn!(event = "cli.agent.close_failed", agent = agent_id.as_str(), error = %e);
    }
    info!(event = "cli.agent.run_completed", agent = agent_id.as_str());
    Ok(())
}
