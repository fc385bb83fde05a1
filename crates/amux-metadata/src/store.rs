use std::fs;
use std::path::Path;

use amux_paths::Paths;
use amux_protocol::{Worktree, WorkspaceMetadata};
use chrono::Utc;
use tracing::{info, warn};

use crate::errors::MetadataError;

/// Write `meta` as indented JSON to
/// `<MetadataRoot>/<ws.id>/workspace.json`, creating the directory at 0755
/// and the file at 0644. The write truncates the existing file, so it is
/// atomic in the sense of "overwrite in place", not "replace-then-rename".
pub fn save(paths: &Paths, worktree_id: &str, meta: &WorkspaceMetadata) -> Result<(), MetadataError> {
    let dir = paths.workspace_metadata_dir(worktree_id);
    create_dir_0755(&dir)?;

    let file = paths.workspace_metadata_file(worktree_id);
    let json = serde_json::to_string_pretty(meta).expect("WorkspaceMetadata always serializes");
    fs::write(&file, json).map_err(|e| MetadataError::Write { path: file.clone(), source: e })?;
    set_file_0644(&file)?;

    info!(event = "metadata.store.save_completed", worktree = worktree_id);
    Ok(())
}

/// Load a workspace's metadata, trying the current filename first, falling
/// back to the legacy filename, and finally a fresh default seeded from
/// `worktree` when neither exists.
pub fn load(paths: &Paths, worktree: &Worktree) -> Result<WorkspaceMetadata, MetadataError> {
    let worktree_id = worktree.id.as_str();
    let current_file = paths.workspace_metadata_file(worktree_id);
    let legacy_file = paths.legacy_workspace_metadata_file(worktree_id);

    match read_json(&current_file)? {
        Some(Ok(meta)) => return Ok(meta),
        Some(Err(parse_error)) => {
            return match read_json(&legacy_file)? {
                Some(Ok(meta)) => {
                    warn!(
                        event = "metadata.store.recovered_from_legacy",
                        worktree = worktree_id,
                        reason = "workspace.json was corrupted; recovered from worktree.json",
                    );
                    Ok(meta)
                }
                Some(Err(legacy_error)) => Err(MetadataError::BothCorrupt {
                    new_error: format!("{parse_error} (legacy also corrupt: {legacy_error})"),
                }),
                None => Err(MetadataError::BothCorrupt { new_error: parse_error.to_string() }),
            };
        }
        None => {}
    }

    if let Some(result) = read_json(&legacy_file)? {
        return match result {
            Ok(meta) => {
                warn!(
                    event = "metadata.store.using_legacy_file",
                    worktree = worktree_id,
                    reason = "Using legacy metadata file. Please rename worktree.json to workspace.json.",
                );
                Ok(meta)
            }
            Err(legacy_error) => Err(MetadataError::BothCorrupt { new_error: legacy_error.to_string() }),
        };
    }

    Ok(WorkspaceMetadata::default_for(worktree, Utc::now()))
}

/// Remove the whole per-workspace metadata directory.
pub fn delete(paths: &Paths, worktree_id: &str) -> Result<(), MetadataError> {
    let dir = paths.workspace_metadata_dir(worktree_id);
    match fs::remove_dir_all(&dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(MetadataError::Write { path: dir, source: e }),
    }
}

/// Read and parse `path` if it exists.
///
/// `None` — file missing. `Some(Ok(_))` — readable and parseable.
/// `Some(Err(_))` — present but unreadable or malformed.
fn read_json(path: &Path) -> Result<Option<Result<WorkspaceMetadata, serde_json::Error>>, MetadataError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(serde_json::from_str(&content))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(MetadataError::Read { path: path.to_path_buf(), source: e }),
    }
}

fn create_dir_0755(path: &Path) -> Result<(), MetadataError> {
    fs::create_dir_all(path).map_err(|e| MetadataError::Write { path: path.to_path_buf(), source: e })?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
            .map_err(|e| MetadataError::Write { path: path.to_path_buf(), source: e })?;
    }
    Ok(())
}

fn set_file_0644(path: &Path) -> Result<(), MetadataError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o644))
            .map_err(|e| MetadataError::Write { path: path.to_path_buf(), source: e })?;
    }
    Ok(())
}
