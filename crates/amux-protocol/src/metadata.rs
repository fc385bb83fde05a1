use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::worktree::Worktree;

/// Where a workspace's agents actually execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuntimeTag {
    #[default]
    LocalWorktree,
    LocalDocker,
    CloudSandbox,
}

/// Whether setup/run/archive scripts for a workspace may run concurrently
/// with scripts from other workspaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptMode {
    Concurrent,
    #[default]
    Nonconcurrent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScriptBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<String>,
}

/// Durable per-workspace record stored as
/// `<MetadataRoot>/<WorktreeId>/workspace.json`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorkspaceMetadata {
    pub name: String,
    pub branch: String,
    pub repo: String,
    pub base: String,
    pub created: DateTime<Utc>,
    pub assistant: String,
    #[serde(default)]
    pub runtime: RuntimeTag,
    #[serde(default)]
    pub script: ScriptBlock,
    #[serde(default)]
    pub script_mode: ScriptMode,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_base: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active_buffer: Option<String>,
    #[serde(default)]
    pub open_tabs: Vec<String>,
    #[serde(default)]
    pub active_tab_index: usize,
}

impl WorkspaceMetadata {
    /// Default metadata seeded from a `Worktree`: assistant `claude`,
    /// runtime `local-worktree`, `script_mode nonconcurrent`, empty env,
    /// `created = now`.
    pub fn default_for(worktree: &Worktree, now: DateTime<Utc>) -> Self {
        Self {
            name: worktree.name.clone(),
            branch: worktree.branch.clone(),
            repo: worktree.repo.clone(),
            base: worktree.base.clone(),
            created: now,
            assistant: "claude".to_string(),
            runtime: RuntimeTag::LocalWorktree,
            script: ScriptBlock::default(),
            script_mode: ScriptMode::Nonconcurrent,
            env: HashMap::new(),
            port_base: None,
            last_active_buffer: None,
            open_tabs: Vec::new(),
            active_tab_index: 0,
        }
    }
}
