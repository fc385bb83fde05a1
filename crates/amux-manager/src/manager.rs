use std::collections::HashMap;
use std::thread::sleep;
use std::time::Duration;

use amux_agents::{plan_resume_command, AssistantRegistry};
use amux_protocol::{AssistantConfig, ResumeInfo, Worktree, WorktreeId};
use amux_pty::Session;
use tracing::{info, warn};
use uuid::Uuid;

use crate::agent::{Agent, AgentKind};
use crate::command::wrap_with_shell_fallback;
use crate::errors::ManagerError;

/// Per-worktree collection of live agent sessions, with lifecycle operations
/// to create, interrupt, and close them.
pub struct AgentManager {
    registry: AssistantRegistry,
    agents: HashMap<WorktreeId, Vec<Agent>>,
}

impl AgentManager {
    pub fn new(registry: AssistantRegistry) -> Self {
        Self { registry, agents: HashMap::new() }
    }

    /// Resolve `kind` via the assistant registry, plan its resume command,
    /// and start a PTY session that falls back to an interactive shell when
    /// the assistant exits.
    pub fn create_agent(
        &mut self,
        wt: &Worktree,
        kind: &str,
        resume: &ResumeInfo,
    ) -> Result<&Agent, ManagerError> {
        let config = self
            .registry
            .get(kind)
            .map_err(|_| ManagerError::UnknownAssistant(kind.to_string()))?
            .clone();

        let resume_command = plan_resume_command(kind, &config.command, resume);
        let command = wrap_with_shell_fallback(&resume_command);

        info!(event = "manager.agent.create_started", worktree = %wt.id, kind = kind);
        self.spawn_agent(wt, AgentKind::Assistant(kind.to_string()), config, &command)
    }

    /// Same as [`create_agent`](Self::create_agent) but runs `command`
    /// unmodified rather than resolving it through the assistant registry.
    pub fn create_viewer(&mut self, wt: &Worktree, command: &str) -> Result<&Agent, ManagerError> {
        let config = AssistantConfig::new(command, 1, 0);
        let wrapped = wrap_with_shell_fallback(command);

        info!(event = "manager.agent.create_viewer_started", worktree = %wt.id);
        self.spawn_agent(wt, AgentKind::Viewer, config, &wrapped)
    }

    fn spawn_agent(
        &mut self,
        wt: &Worktree,
        kind: AgentKind,
        config: AssistantConfig,
        command: &str,
    ) -> Result<&Agent, ManagerError> {
        let env = [
            ("WORKTREE_ROOT".to_string(), wt.root.display().to_string()),
            ("WORKTREE_NAME".to_string(), wt.name.clone()),
            ("LINES".to_string(), String::new()),
            ("COLUMNS".to_string(), String::new()),
        ];

        let session = Session::spawn(command, &wt.root, &env, None)?;
        let agent = Agent { id: Uuid::new_v4().to_string(), kind, worktree_id: wt.id.clone(), config, session };

        info!(event = "manager.agent.create_completed", worktree = %wt.id, agent = %agent.id);

        let list = self.agents.entry(wt.id.clone()).or_default();
        list.push(agent);
        Ok(list.last().expect("just pushed"))
    }

    /// Close one agent, wherever it lives, and drop it from its worktree's
    /// list.
    pub fn close_agent(&mut self, agent_id: &str) -> Result<(), ManagerError> {
        for agents in self.agents.values_mut() {
            if let Some(pos) = agents.iter().position(|a| a.id == agent_id) {
                let agent = agents.remove(pos);
                close_quietly(&agent);
                return Ok(());
            }
        }
        Err(ManagerError::AgentNotFound(agent_id.to_string()))
    }

    /// Close every agent for `worktree_id` and drop the map entry.
    pub fn close_worktree_agents(&mut self, worktree_id: &WorktreeId) {
        if let Some(agents) = self.agents.remove(worktree_id) {
            for agent in &agents {
                close_quietly(agent);
            }
        }
    }

    /// Close every agent across every worktree and reset the map.
    pub fn close_all(&mut self) {
        for agents in self.agents.values() {
            for agent in agents {
                close_quietly(agent);
            }
        }
        self.agents.clear();
    }

    /// Send `config.interrupt_count` ETX bytes to the agent's PTY, sleeping
    /// `interrupt_delay_ms` between sends (never after the last one).
    pub fn send_interrupt(&self, agent_id: &str) -> Result<(), ManagerError> {
        let agent = self
            .find(agent_id)
            .ok_or_else(|| ManagerError::AgentNotFound(agent_id.to_string()))?;

        for i in 0..agent.config.interrupt_count {
            agent.session.send_interrupt()?;
            if i + 1 < agent.config.interrupt_count {
                sleep(Duration::from_millis(agent.config.interrupt_delay_ms));
            }
        }
        Ok(())
    }

    pub fn agents_for(&self, worktree_id: &WorktreeId) -> &[Agent] {
        self.agents.get(worktree_id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn find(&self, agent_id: &str) -> Option<&Agent> {
        self.agents.values().flatten().find(|a| a.id == agent_id)
    }
}

/// `close()` never aborts the caller; a per-agent failure is logged and the
/// rest of the batch still proceeds.
fn close_quietly(agent: &Agent) {
    if let Err(e) = agent.session.close() {
        warn!(event = "manager.agent.close_failed", agent = %agent.id, error = %e);
    }
}
