//! Per-assistant session discovery: scanning an assistant's on-disk session
//! store, or shelling out to a list subcommand, to find the most recent
//! session that touches a given worktree.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::process::Command;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;

use crate::errors::AgentsError;

const MAX_SCAN_BYTES: usize = 2 * 1024 * 1024;

/// A candidate session discovered on disk or via a list subcommand.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionCandidate {
    pub id: String,
    pub modified: SystemTime,
    /// Whether this candidate's content references the worktree root.
    pub matched: bool,
}

/// Scan `<user_home>/.codex/sessions` for candidates.
pub fn discover_codex_sessions(
    user_home: &Path,
    worktree_root: &Path,
) -> Result<Vec<SessionCandidate>, AgentsError> {
    scan_session_dir(&user_home.join(".codex").join("sessions"), worktree_root)
}

/// Scan `<user_home>/.gemini/tmp/*/chats/*` for candidates.
pub fn discover_gemini_sessions(
    user_home: &Path,
    worktree_root: &Path,
) -> Result<Vec<SessionCandidate>, AgentsError> {
    let mut candidates = Vec::new();
    let tmp_root = user_home.join(".gemini").join("tmp");
    let Ok(session_dirs) = fs::read_dir(&tmp_root) else {
        return Ok(candidates);
    };
    for session_dir in session_dirs.flatten() {
        let chats = session_dir.path().join("chats");
        let Ok(chat_files) = fs::read_dir(&chats) else {
            continue;
        };
        for chat_file in chat_files.flatten() {
            if let Some(candidate) = candidate_from_file(&chat_file.path(), worktree_root)? {
                candidates.push(candidate);
            }
        }
    }
    Ok(candidates)
}

fn scan_session_dir(
    dir: &Path,
    worktree_root: &Path,
) -> Result<Vec<SessionCandidate>, AgentsError> {
    let mut candidates = Vec::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return Ok(candidates);
    };
    for entry in entries.flatten() {
        if let Some(candidate) = candidate_from_file(&entry.path(), worktree_root)? {
            candidates.push(candidate);
        }
    }
    Ok(candidates)
}

fn candidate_from_file(
    path: &Path,
    worktree_root: &Path,
) -> Result<Option<SessionCandidate>, AgentsError> {
    let metadata = match fs::metadata(path) {
        Ok(m) if m.is_file() => m,
        _ => return Ok(None),
    };
    let modified = metadata
        .modified()
        .map_err(|e| AgentsError::Scan { path: path.to_path_buf(), source: e })?;

    let content = read_bounded(path, MAX_SCAN_BYTES)?;
    let matched = content.contains(&worktree_root.display().to_string());
    let id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    Ok(Some(SessionCandidate { id, modified, matched }))
}

fn read_bounded(path: &Path, max_bytes: usize) -> Result<String, AgentsError> {
    let mut file =
        File::open(path).map_err(|e| AgentsError::Scan { path: path.to_path_buf(), source: e })?;
    let mut buf = vec![0u8; max_bytes];
    let n = file
        .read(&mut buf)
        .map_err(|e| AgentsError::Scan { path: path.to_path_buf(), source: e })?;
    buf.truncate(n);
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Candidate selection policy for file-based discovery: filter to candidates
/// newer than `started_at - 2s` (when known), then order by (matched,
/// modtime desc) and take the first id.
pub fn select_candidate(
    candidates: &[SessionCandidate],
    started_at: Option<SystemTime>,
) -> Option<String> {
    let cutoff = started_at.map(|t| t.checked_sub(Duration::from_secs(2)).unwrap_or(t));
    let mut pool: Vec<&SessionCandidate> = candidates
        .iter()
        .filter(|c| cutoff.is_none_or(|cutoff| c.modified > cutoff))
        .collect();
    pool.sort_by(|a, b| b.matched.cmp(&a.matched).then(b.modified.cmp(&a.modified)));
    pool.first().map(|c| c.id.clone())
}

/// Run `opencode session list --format json` and parse its output.
pub fn discover_opencode_sessions(worktree_root: &Path) -> Result<Vec<SessionCandidate>, AgentsError> {
    let output = Command::new("opencode")
        .args(["session", "list", "--format", "json"])
        .output()
        .map_err(|e| AgentsError::Spawn { command: "opencode session list".to_string(), source: e })?;
    if !output.status.success() {
        return Ok(Vec::new());
    }
    Ok(candidates_from_json_list(
        &String::from_utf8_lossy(&output.stdout),
        worktree_root,
    ))
}

/// Try `amp threads list --format json`, then `--json`, then plain text;
/// parse JSON when possible, else extract a `T-[a-z0-9-]+` id from the text.
pub fn discover_amp_sessions(worktree_root: &Path) -> Result<Vec<SessionCandidate>, AgentsError> {
    for args in [
        &["threads", "list", "--format", "json"][..],
        &["threads", "list", "--json"][..],
        &["threads", "list"][..],
    ] {
        let output = match Command::new("amp").args(args).output() {
            Ok(output) if output.status.success() => output,
            _ => continue,
        };
        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        let candidates = candidates_from_json_list(&text, worktree_root);
        if !candidates.is_empty() {
            return Ok(candidates);
        }
        if let Some(id) = extract_amp_thread_id(&text) {
            return Ok(vec![SessionCandidate { id, modified: SystemTime::now(), matched: false }]);
        }
    }
    Ok(Vec::new())
}

fn extract_amp_thread_id(text: &str) -> Option<String> {
    Regex::new(r"T-[a-z0-9-]+").unwrap().find(text).map(|m| m.as_str().to_string())
}

/// Parse a JSON array, or an object keyed by one of
/// `sessions|threads|items|data`, into candidates ordered as `select_*`
/// would expect: candidates whose serialized body contains the worktree
/// root are `matched`, with a single best id surfaced first.
fn candidates_from_json_list(text: &str, worktree_root: &Path) -> Vec<SessionCandidate> {
    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return Vec::new();
    };
    let items: Vec<Value> = match value {
        Value::Array(items) => items,
        Value::Object(map) => ["sessions", "threads", "items", "data"]
            .iter()
            .find_map(|key| map.get(*key))
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    let root_str = worktree_root.display().to_string();
    let matched: Vec<&Value> = items.iter().filter(|item| item.to_string().contains(&root_str)).collect();
    let pool: Vec<&Value> = if matched.is_empty() { items.iter().collect() } else { matched };

    let Some(id) = newest_by_timestamp(&pool) else {
        return Vec::new();
    };
    vec![SessionCandidate { id, modified: SystemTime::now(), matched: true }]
}

fn newest_by_timestamp(items: &[&Value]) -> Option<String> {
    let mut best: Option<(DateTime<Utc>, String)> = None;
    let mut first_id: Option<String> = None;

    for item in items {
        let Some(id) = extract_id(item) else { continue };
        if first_id.is_none() {
            first_id = Some(id.clone());
        }
        let Some(ts) = ["updated_at", "created_at", "timestamp", "time"]
            .iter()
            .find_map(|key| item.get(*key))
            .and_then(|v| v.as_str())
            .and_then(parse_rfc3339_variant)
        else {
            continue;
        };
        match &best {
            Some((best_ts, _)) if *best_ts >= ts => {}
            _ => best = Some((ts, id)),
        }
    }

    best.map(|(_, id)| id).or(first_id)
}

fn parse_rfc3339_variant(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.with_timezone(&Utc))
}

fn extract_id(item: &Value) -> Option<String> {
    match item.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread::sleep;

    #[test]
    fn test_missing_codex_sessions_dir_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let candidates = discover_codex_sessions(dir.path(), Path::new("/repo")).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_candidate_matched_when_content_contains_worktree_root() {
        let dir = tempfile::TempDir::new().unwrap();
        let sessions = dir.path().join(".codex/sessions");
        fs::create_dir_all(&sessions).unwrap();
        fs::write(sessions.join("a.json"), r#"{"root":"/repo/feature"}"#).unwrap();
        fs::write(sessions.join("b.json"), r#"{"root":"/other"}"#).unwrap();

        let candidates = discover_codex_sessions(dir.path(), Path::new("/repo/feature")).unwrap();
        assert_eq!(candidates.len(), 2);
        let matched: Vec<&SessionCandidate> = candidates.iter().filter(|c| c.matched).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "a");
    }

    #[test]
    fn test_select_candidate_prefers_matched_then_newest() {
        let dir = tempfile::TempDir::new().unwrap();
        let sessions = dir.path().join(".codex/sessions");
        fs::create_dir_all(&sessions).unwrap();
        fs::write(sessions.join("old_unmatched.json"), "{}").unwrap();
        sleep(Duration::from_millis(10));
        fs::write(sessions.join("matched.json"), r#"{"root":"/repo"}"#).unwrap();
        sleep(Duration::from_millis(10));
        fs::write(sessions.join("newer_unmatched.json"), "{}").unwrap();

        let candidates = discover_codex_sessions(dir.path(), Path::new("/repo")).unwrap();
        let best = select_candidate(&candidates, None);
        assert_eq!(best, Some("matched".to_string()));
    }

    #[test]
    fn test_select_candidate_filters_by_started_at() {
        let now = SystemTime::now();
        let candidates = vec![
            SessionCandidate {
                id: "too_old".into(),
                modified: now.checked_sub(Duration::from_secs(10)).unwrap(),
                matched: false,
            },
            SessionCandidate { id: "recent".into(), modified: now, matched: false },
        ];
        let best = select_candidate(&candidates, Some(now));
        assert_eq!(best, Some("recent".to_string()));
    }

    #[test]
    fn test_gemini_scans_nested_chats_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let chats = dir.path().join(".gemini/tmp/session1/chats");
        fs::create_dir_all(&chats).unwrap();
        fs::write(chats.join("chat1.json"), r#"{"root":"/repo"}"#).unwrap();

        let candidates = discover_gemini_sessions(dir.path(), Path::new("/repo")).unwrap();
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].matched);
    }

    #[test]
    fn test_candidates_from_json_array() {
        let text = r#"[
            {"id": "s1", "updated_at": "2024-01-01T00:00:00Z"},
            {"id": "s2", "updated_at": "2024-06-01T00:00:00Z"}
        ]"#;
        let candidates = candidates_from_json_list(text, Path::new("/repo"));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "s2");
    }

    #[test]
    fn test_candidates_from_json_object_keyed_by_sessions() {
        let text = r#"{"sessions": [{"id": "only", "created_at": "2024-01-01T00:00:00Z"}]}"#;
        let candidates = candidates_from_json_list(text, Path::new("/repo"));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "only");
    }

    #[test]
    fn test_candidates_prefer_matched_subset() {
        let text = r#"[
            {"id": "unmatched", "path": "/elsewhere", "updated_at": "2024-06-01T00:00:00Z"},
            {"id": "matched", "path": "/repo/feature", "updated_at": "2024-01-01T00:00:00Z"}
        ]"#;
        let candidates = candidates_from_json_list(text, Path::new("/repo/feature"));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "matched");
    }

    #[test]
    fn test_extract_amp_thread_id_from_plain_text() {
        let text = "Created thread T-abc123-def at 2024-01-01";
        assert_eq!(extract_amp_thread_id(text), Some("T-abc123-def".to_string()));
    }

    #[test]
    fn test_extract_amp_thread_id_absent() {
        assert_eq!(extract_amp_thread_id("no thread here"), None);
    }
}
