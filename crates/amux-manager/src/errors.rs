#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("unknown assistant '{0}'")]
    UnknownAssistant(String),
    #[error("agent '{0}' not found")]
    AgentNotFound(String),
    #[error("failed to start agent: {0}")]
    StartFailed(#[from] amux_pty::PtyError),
}
