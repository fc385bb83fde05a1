#[derive(Debug, thiserror::Error)]
pub enum PtyError {
    #[error("failed to open pty: {0}")]
    OpenFailed(String),
    #[error("failed to spawn '{command}': {reason}")]
    SpawnFailed { command: String, reason: String },
    #[error("session is closed")]
    Closed,
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("read failed: {0}")]
    ReadFailed(String),
    #[error("resize failed: {0}")]
    ResizeFailed(String),
    #[error("clone reader failed: {0}")]
    CloneReaderFailed(String),
}
