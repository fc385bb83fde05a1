use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AgentsError {
    #[error("unknown assistant '{id}'")]
    UnknownAssistant { id: String },
    #[error("failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}
