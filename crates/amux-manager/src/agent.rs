use amux_protocol::{AssistantConfig, WorktreeId};
use amux_pty::Session;

/// What an [`Agent`] runs: a registry-resolved assistant, or a caller-supplied
/// viewer command run unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentKind {
    Assistant(String),
    Viewer,
}

/// A live PTY session scoped to one worktree.
///
/// Created by [`crate::AgentManager`]; shared read-only with the UI layer;
/// destroyed by [`crate::AgentManager::close_agent`], which closes the PTY
/// and its process group.
pub struct Agent {
    pub id: String,
    pub kind: AgentKind,
    pub worktree_id: WorktreeId,
    pub config: AssistantConfig,
    pub session: Session,
}

impl Agent {
    pub fn is_running(&self) -> bool {
        self.session.running()
    }
}
