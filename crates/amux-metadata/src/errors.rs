use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Both the new and legacy metadata files are unreadable or malformed.
    #[error("workspace.json and worktree.json are both unreadable: {new_error}")]
    BothCorrupt { new_error: String },
}
