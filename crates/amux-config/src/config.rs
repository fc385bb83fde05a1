use std::collections::HashMap;

use amux_paths::Paths;
use amux_protocol::AssistantConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ConfigError;
use crate::json_file::{load_or_default, write_json};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_keymap_hints: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

/// `config.json`: the user's assistant overrides and UI preferences.
///
/// Unrecognized top-level keys round-trip through `extra` unchanged — the
/// save routine is a superset writer, never a lossy one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_assistant: Option<String>,
    #[serde(default)]
    pub assistants: HashMap<String, AssistantConfig>,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub fn load_config(paths: &Paths) -> Result<Config, ConfigError> {
    load_or_default(&paths.config_path())
}

pub fn save_config(paths: &Paths, config: &Config) -> Result<(), ConfigError> {
    write_json(&paths.config_path(), config)
}
