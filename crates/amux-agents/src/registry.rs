use std::collections::HashMap;

use amux_config::Config;
use amux_protocol::{AssistantConfig, AssistantId};

use crate::errors::AgentsError;

/// Hard-coded ordering priority used by [`AssistantRegistry::assistant_names`].
/// Only ids actually present in the merged registry are emitted, in this
/// order; anything else follows in lexicographic order.
const PRIORITY_ORDER: [&str; 9] = [
    "claude", "codex", "gemini", "amp", "opencode", "droid", "cline", "cursor", "pi",
];

fn builtin_assistants() -> HashMap<String, AssistantConfig> {
    let mut assistants = HashMap::new();
    assistants.insert("claude".to_string(), AssistantConfig::new("claude", 2, 200));
    assistants.insert("codex".to_string(), AssistantConfig::new("codex", 1, 0));
    assistants.insert("gemini".to_string(), AssistantConfig::new("gemini", 1, 0));
    assistants.insert("amp".to_string(), AssistantConfig::new("amp", 1, 0));
    assistants.insert(
        "opencode".to_string(),
        AssistantConfig::new("opencode", 1, 0),
    );
    assistants.insert("droid".to_string(), AssistantConfig::new("droid", 1, 0));
    assistants.insert("shell".to_string(), AssistantConfig::new("sh", 1, 0));
    assistants
}

/// Built-in assistant recipes merged with user overrides from `config.json`.
pub struct AssistantRegistry {
    default_assistant: String,
    assistants: HashMap<String, AssistantConfig>,
}

impl AssistantRegistry {
    /// Merge the built-in table with `config`'s `assistants` overrides.
    /// Override ids containing whitespace are rejected and never merged in.
    pub fn from_config(config: &Config) -> Self {
        let mut assistants = builtin_assistants();
        for (id, cfg) in &config.assistants {
            if AssistantId::new(id.clone()).is_valid() {
                let mut cfg = cfg.clone();
                if !cfg.is_valid() {
                    tracing::warn!(
                        event = "agents.registry.invalid_interrupt_count_clamped",
                        id = id.as_str(),
                        interrupt_count = cfg.interrupt_count,
                    );
                    cfg.interrupt_count = cfg.interrupt_count.max(1);
                }
                assistants.insert(id.clone(), cfg);
            } else {
                tracing::warn!(
                    event = "agents.registry.invalid_assistant_id_ignored",
                    id = id.as_str(),
                );
            }
        }

        let default_assistant = config
            .default_assistant
            .clone()
            .filter(|id| assistants.contains_key(id))
            .unwrap_or_else(|| "claude".to_string());

        Self {
            default_assistant,
            assistants,
        }
    }

    pub fn get(&self, id: &str) -> Result<&AssistantConfig, AgentsError> {
        self.assistants
            .get(id)
            .ok_or_else(|| AgentsError::UnknownAssistant { id: id.to_string() })
    }

    /// The configured default assistant if it resolved to a known recipe,
    /// else `"claude"`.
    pub fn resolved_default_assistant(&self) -> &str {
        &self.default_assistant
    }

    /// Known ids: the hard-coded priority list first (in that order, skipping
    /// absent ones), then any remaining user-defined ids lexicographically.
    pub fn assistant_names(&self) -> Vec<String> {
        let mut names: Vec<String> = PRIORITY_ORDER
            .iter()
            .filter(|id| self.assistants.contains_key(**id))
            .map(|id| id.to_string())
            .collect();

        let mut rest: Vec<String> = self
            .assistants
            .keys()
            .filter(|id| !PRIORITY_ORDER.contains(&id.as_str()))
            .cloned()
            .collect();
        rest.sort();
        names.extend(rest);
        names
    }
}
