/// A directive describing how to relaunch an assistant so it rejoins a
/// prior conversation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ResumeInfo {
    /// Start fresh; no resume directive.
    None,
    /// Use the assistant's own "continue most recent" flag.
    Continue,
    /// Use the assistant's own "resume last" flag.
    Last,
    /// Resume a specific, already-known session id.
    Id { id: String },
    /// Resume the Nth most recent session (UI-facing picker index).
    Index { index: usize },
}

impl ResumeInfo {
    /// Per-assistant hard-coded default, used when the caller doesn't ask
    /// for a specific resume mode.
    pub fn default_for_assistant(assistant: &str) -> Self {
        match assistant {
            "codex" => ResumeInfo::Last,
            "claude" | "gemini" | "amp" | "opencode" => ResumeInfo::Continue,
            _ => ResumeInfo::None,
        }
    }
}
