use std::path::PathBuf;

use crate::newtype_string;

newtype_string! {
    /// Stable opaque identifier for a worktree, assigned by the UI layer.
    WorktreeId
}

/// A Git working tree checkout plus the minimal metadata the core needs.
/// Created and destroyed by the UI layer (or its CLI/tests); the core
/// treats it as an opaque, externally-owned record.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Worktree {
    pub id: WorktreeId,
    pub name: String,
    pub branch: String,
    pub repo: String,
    /// Absolute path to the worktree's working directory.
    pub root: PathBuf,
    pub base: String,
}
