use amux_protocol::ResumeInfo;

/// Compose the final command line for launching `assistant` given its base
/// command and a resume directive.
///
/// `Index` is a UI-facing picker value; planning expects it to have already
/// been resolved to a concrete `Id` by the caller (via session discovery),
/// so it falls back to the base command here, same as an empty `Id`.
pub fn plan_resume_command(assistant: &str, base_command: &str, resume: &ResumeInfo) -> String {
    match resume {
        ResumeInfo::None | ResumeInfo::Index { .. } => base_command.to_string(),
        ResumeInfo::Id { id } if id.is_empty() => base_command.to_string(),
        ResumeInfo::Id { id } => match assistant {
            "codex" => format!("{base_command} resume {id}"),
            "claude" => format!("{base_command} --resume {id}"),
            "gemini" => format!("{base_command} --resume {id}"),
            "amp" => format!("{base_command} threads continue {id}"),
            "opencode" => format!("{base_command} --session {id}"),
            _ => base_command.to_string(),
        },
        ResumeInfo::Continue | ResumeInfo::Last => match assistant {
            "codex" => format!("{base_command} resume --last"),
            "claude" => format!("{base_command} --continue"),
            "gemini" => format!("{base_command} --resume"),
            // amp has no resume flag; callers send an interactive `/continue`
            // as input after the process starts.
            "amp" => base_command.to_string(),
            "opencode" => format!("{base_command} --continue"),
            _ => base_command.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codex_resume_by_id() {
        let resume = ResumeInfo::Id { id: "abc".into() };
        assert_eq!(
            plan_resume_command("codex", "codex", &resume),
            "codex resume abc"
        );
    }

    #[test]
    fn test_codex_resume_last() {
        assert_eq!(
            plan_resume_command("codex", "codex", &ResumeInfo::Last),
            "codex resume --last"
        );
    }

    #[test]
    fn test_codex_empty_id_falls_back_to_base_command() {
        let resume = ResumeInfo::Id { id: String::new() };
        assert_eq!(plan_resume_command("codex", "codex", &resume), "codex");
    }

    #[test]
    fn test_claude_continue_and_resume_by_id() {
        assert_eq!(
            plan_resume_command("claude", "claude", &ResumeInfo::Continue),
            "claude --continue"
        );
        let resume = ResumeInfo::Id { id: "xyz".into() };
        assert_eq!(
            plan_resume_command("claude", "claude", &resume),
            "claude --resume xyz"
        );
    }

    #[test]
    fn test_gemini_continue_has_no_argument() {
        assert_eq!(
            plan_resume_command("gemini", "gemini", &ResumeInfo::Continue),
            "gemini --resume"
        );
    }

    #[test]
    fn test_amp_continue_is_base_command_unmodified() {
        assert_eq!(
            plan_resume_command("amp", "amp", &ResumeInfo::Continue),
            "amp"
        );
    }

    #[test]
    fn test_opencode_resume_by_id_and_continue() {
        let resume = ResumeInfo::Id { id: "s1".into() };
        assert_eq!(
            plan_resume_command("opencode", "opencode", &resume),
            "opencode --session s1"
        );
        assert_eq!(
            plan_resume_command("opencode", "opencode", &ResumeInfo::Continue),
            "opencode --continue"
        );
    }

    #[test]
    fn test_unknown_assistant_always_uses_base_command() {
        assert_eq!(
            plan_resume_command("droid", "droid", &ResumeInfo::Continue),
            "droid"
        );
        assert_eq!(
            plan_resume_command("droid", "droid", &ResumeInfo::None),
            "droid"
        );
    }
}
