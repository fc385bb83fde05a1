/// Shell fallback used when the user's own `$SHELL` isn't set.
const DEFAULT_USER_SHELL: &str = "/bin/sh";

/// Notice printed to the PTY once the wrapped command exits, just before
/// falling back to an interactive shell in the same worktree.
const EXIT_NOTICE: &str = "[agent exited — dropping to shell]";

/// Wrap `inner` so that once it exits the terminal clears, prints a notice,
/// and execs into an interactive shell in the same worktree rather than
/// closing the PTY outright.
pub fn wrap_with_shell_fallback(inner: &str) -> String {
    let user_shell = std::env::var("SHELL").unwrap_or_else(|_| DEFAULT_USER_SHELL.to_string());
    format!(
        "{inner}; printf '\\033c'; echo '{EXIT_NOTICE}'; export TERM=xterm-256color; exec {user_shell}"
    )
}
