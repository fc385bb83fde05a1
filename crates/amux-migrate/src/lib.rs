//! One-way, idempotent copy migration from `worktrees(-metadata)` to
//! `workspaces(-metadata)`.
//!
//! Running migration N times is equivalent to running it once: an existing
//! destination is never overwritten, and a missing or non-directory source
//! is a no-op.

use std::fs;
use std::path::{Path, PathBuf};

use amux_paths::Paths;

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of a single root-pair migration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootOutcome {
    /// Legacy root did not exist — nothing to do.
    NoLegacySource,
    /// Legacy root exists but is not a directory — skipped.
    LegacyNotADirectory,
    /// New root already existed — never overwritten.
    DestinationAlreadyExists,
    /// Legacy tree was copied into the new root.
    Copied,
    /// Copy was attempted but failed partway through; see `first_error`.
    Failed,
}

/// Result of running migration over both managed roots.
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub workspaces_root: Option<RootOutcome>,
    pub metadata_root: Option<RootOutcome>,
    pub first_error: Option<String>,
}

impl MigrationReport {
    pub fn migrated_workspaces_root(&self) -> bool {
        self.workspaces_root == Some(RootOutcome::Copied)
    }

    pub fn migrated_metadata_root(&self) -> bool {
        self.metadata_root == Some(RootOutcome::Copied)
    }
}

/// Run migration for both the workspaces root and the metadata root.
///
/// Collects the first error encountered across both roots but still
/// attempts the second root even if the first failed, matching the report
/// contract ("which roots were copied and the first error, if any").
pub fn run_migrations(paths: &Paths) -> MigrationReport {
    let mut report = MigrationReport::default();

    match migrate_root(&paths.legacy_worktrees_root(), &paths.workspaces_root()) {
        Ok(outcome) => report.workspaces_root = Some(outcome),
        Err(e) => {
            report.workspaces_root = Some(RootOutcome::Failed);
            report.first_error.get_or_insert_with(|| e.to_string());
        }
    }

    match migrate_root(&paths.legacy_metadata_root(), &paths.metadata_root()) {
        Ok(outcome) => report.metadata_root = Some(outcome),
        Err(e) => {
            report.metadata_root = Some(RootOutcome::Failed);
            report.first_error.get_or_insert_with(|| e.to_string());
        }
    }

    report
}

/// Migrate a single legacy→new root pair.
fn migrate_root(legacy: &Path, new: &Path) -> Result<RootOutcome, MigrationError> {
    if !legacy.exists() {
        return Ok(RootOutcome::NoLegacySource);
    }
    if !legacy.is_dir() {
        tracing::warn!(
            event = "migrate.root.legacy_not_a_directory",
            path = %legacy.display(),
        );
        return Ok(RootOutcome::LegacyNotADirectory);
    }
    if new.exists() {
        tracing::debug!(
            event = "migrate.root.destination_exists",
            path = %new.display(),
        );
        return Ok(RootOutcome::DestinationAlreadyExists);
    }

    tracing::info!(
        event = "migrate.root.copy_started",
        from = %legacy.display(),
        to = %new.display(),
    );

    if let Err(e) = copy_tree(legacy, new) {
        // Partial copy failure: delete the partially-created destination.
        let _ = fs::remove_dir_all(new);
        tracing::error!(
            event = "migrate.root.copy_failed",
            from = %legacy.display(),
            to = %new.display(),
            error = %e,
        );
        return Err(e);
    }

    tracing::info!(
        event = "migrate.root.copy_completed",
        from = %legacy.display(),
        to = %new.display(),
    );
    Ok(RootOutcome::Copied)
}

/// Recursively copy `src` into `dst`, preserving file mode and symlinks.
/// Symlink targets are copied verbatim — never dereferenced.
fn copy_tree(src: &Path, dst: &Path) -> Result<(), MigrationError> {
    fs::create_dir_all(dst).map_err(|e| MigrationError::Write {
        path: dst.to_path_buf(),
        source: e,
    })?;
    copy_permissions(src, dst)?;

    for entry in fs::read_dir(src).map_err(|e| MigrationError::Read {
        path: src.to_path_buf(),
        source: e,
    })? {
        let entry = entry.map_err(|e| MigrationError::Read {
            path: src.to_path_buf(),
            source: e,
        })?;
        let file_type = entry.file_type().map_err(|e| MigrationError::Read {
            path: entry.path(),
            source: e,
        })?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if file_type.is_symlink() {
            copy_symlink(&src_path, &dst_path)?;
        } else if file_type.is_dir() {
            copy_tree(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path).map_err(|e| MigrationError::Write {
                path: dst_path.clone(),
                source: e,
            })?;
            copy_permissions(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<(), MigrationError> {
    let target = fs::read_link(src).map_err(|e| MigrationError::Read {
        path: src.to_path_buf(),
        source: e,
    })?;
    std::os::unix::fs::symlink(&target, dst).map_err(|e| MigrationError::Write {
        path: dst.to_path_buf(),
        source: e,
    })
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> Result<(), MigrationError> {
    let target = fs::read_link(src).map_err(|e| MigrationError::Read {
        path: src.to_path_buf(),
        source: e,
    })?;
    std::os::windows::fs::symlink_file(&target, dst).map_err(|e| MigrationError::Write {
        path: dst.to_path_buf(),
        source: e,
    })
}

#[cfg(unix)]
fn copy_permissions(src: &Path, dst: &Path) -> Result<(), MigrationError> {
    let meta = fs::symlink_metadata(src).map_err(|e| MigrationError::Read {
        path: src.to_path_buf(),
        source: e,
    })?;
    fs::set_permissions(dst, meta.permissions()).map_err(|e| MigrationError::Write {
        path: dst.to_path_buf(),
        source: e,
    })
}

#[cfg(not(unix))]
fn copy_permissions(_src: &Path, _dst: &Path) -> Result<(), MigrationError> {
    Ok(())
}
