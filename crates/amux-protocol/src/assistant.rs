use crate::newtype_string;

newtype_string! {
    /// Identifier for an assistant (kebab or snake case, e.g. `"claude"`,
    /// `"my-agent"`). Must never contain whitespace.
    AssistantId
}

impl AssistantId {
    /// Whether this identifier is well-formed: non-empty and free of
    /// whitespace.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && !self.0.chars().any(char::is_whitespace)
    }
}

/// Launch recipe for one assistant: its shell command plus interrupt
/// protocol.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssistantConfig {
    pub command: String,
    #[serde(default = "default_interrupt_count")]
    pub interrupt_count: u32,
    #[serde(default = "default_interrupt_delay_ms")]
    pub interrupt_delay_ms: u64,
}

fn default_interrupt_count() -> u32 {
    1
}

fn default_interrupt_delay_ms() -> u64 {
    0
}

impl AssistantConfig {
    pub fn new(command: impl Into<String>, interrupt_count: u32, interrupt_delay_ms: u64) -> Self {
        Self {
            command: command.into(),
            interrupt_count: interrupt_count.max(1),
            interrupt_delay_ms,
        }
    }

    /// Invariant: `interrupt_count >= 1`.
    pub fn is_valid(&self) -> bool {
        self.interrupt_count >= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assistant_id_rejects_whitespace() {
        assert!(!AssistantId::new("my agent").is_valid());
        assert!(AssistantId::new("my-agent").is_valid());
        assert!(AssistantId::new("my_agent").is_valid());
    }

    #[test]
    fn test_assistant_id_rejects_empty() {
        assert!(!AssistantId::new("").is_valid());
    }

    #[test]
    fn test_assistant_config_invariant() {
        let cfg = AssistantConfig::new("claude", 2, 200);
        assert!(cfg.is_valid());
    }

    #[test]
    fn test_assistant_config_serde_defaults() {
        let json = r#"{"command":"claude"}"#;
        let cfg: AssistantConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.interrupt_count, 1);
        assert_eq!(cfg.interrupt_delay_ms, 0);
    }
}
