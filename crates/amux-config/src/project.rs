use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::json_file::load_or_default;

/// `.amux/project.json`: per-repository tracker and script wiring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_prefix: Option<String>,
    #[serde(default)]
    pub setup_scripts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linear_team_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linear_project_id: Option<String>,
}

/// Legacy `.amux/worktrees.json` shape, accepted when `project.json` is
/// absent.
#[derive(Debug, Clone, Default, Deserialize)]
struct LegacyProjectConfig {
    #[serde(default, rename = "setup-worktree")]
    setup_worktree: Vec<String>,
    #[serde(default)]
    run: Option<String>,
    #[serde(default)]
    archive: Option<String>,
}

impl From<LegacyProjectConfig> for ProjectConfig {
    fn from(legacy: LegacyProjectConfig) -> Self {
        Self {
            setup_scripts: legacy.setup_worktree,
            run_script: legacy.run,
            archive_script: legacy.archive,
            ..Default::default()
        }
    }
}

/// Load `<root>/.amux/project.json`, falling back to the legacy
/// `<root>/.amux/worktrees.json` when the new file is absent. Neither file
/// existing yields `ProjectConfig::default()`.
pub fn load_project_config(root: &Path) -> Result<ProjectConfig, ConfigError> {
    let project_json = root.join(".amux").join("project.json");
    if project_json.exists() {
        return load_or_default(&project_json);
    }

    let legacy_json = root.join(".amux").join("worktrees.json");
    let legacy: LegacyProjectConfig = load_or_default(&legacy_json)?;
    Ok(legacy.into())
}
