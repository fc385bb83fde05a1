use amux_paths::Paths;
use amux_protocol::Issue;

use crate::errors::LinearError;

/// Load the disk-cached issue list for `account`/`viewer_id`, or an empty
/// list when no cache exists yet.
pub fn load(paths: &Paths, account: &str, viewer_id: &str) -> Result<Vec<Issue>, LinearError> {
    let path = paths.linear_cache_file(account, viewer_id);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let bytes = std::fs::read(&path).map_err(|source| LinearError::CacheRead { path: path.clone(), source })?;
    serde_json::from_slice(&bytes).map_err(|source| LinearError::CacheDecode { path, source })
}

/// Persist `issues` to the disk cache for `account`/`viewer_id`.
pub fn save(paths: &Paths, account: &str, viewer_id: &str, issues: &[Issue]) -> Result<(), LinearError> {
    let dir = paths.linear_cache_dir(account, viewer_id);
    std::fs::create_dir_all(&dir).map_err(|source| LinearError::CacheWrite { path: dir.clone(), source })?;
    let path = paths.linear_cache_file(account, viewer_id);
    let bytes = serde_json::to_vec_pretty(issues)
        .map_err(|source| LinearError::CacheDecode { path: path.clone(), source })?;
    std::fs::write(&path, bytes).map_err(|source| LinearError::CacheWrite { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use amux_protocol::{IssueState, LinearTeam};
    use chrono::Utc;

    fn issue(id: &str) -> Issue {
        Issue {
            id: id.to_string(),
            identifier: "ENG-1".into(),
            title: "title".into(),
            description: None,
            url: "https://linear.app/x".into(),
            priority: 0.0,
            state: IssueState { id: "s1".into(), name: "Todo".into(), state_type: "backlog".into() },
            team: LinearTeam { id: "t1".into(), key: "ENG".into(), name: "Engineering".into() },
            project: None,
            assignee: None,
            labels: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
            account: "work".into(),
        }
    }

    #[test]
    fn test_load_missing_cache_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::from_dir(dir.path().to_path_buf());
        let issues = load(&paths, "work", "viewer-1").unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_save_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::from_dir(dir.path().to_path_buf());
        let issues = vec![issue("issue-1"), issue("issue-2")];
        save(&paths, "work", "viewer-1", &issues).unwrap();

        let loaded = load(&paths, "work", "viewer-1").unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "issue-1");
    }

    #[test]
    fn test_load_corrupt_cache_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::from_dir(dir.path().to_path_buf());
        let cache_dir = paths.linear_cache_dir("work", "viewer-1");
        std::fs::create_dir_all(&cache_dir).unwrap();
        std::fs::write(paths.linear_cache_file("work", "viewer-1"), b"not json").unwrap();

        let err = load(&paths, "work", "viewer-1").unwrap_err();
        assert!(matches!(err, LinearError::CacheDecode { .. }));
    }
}
