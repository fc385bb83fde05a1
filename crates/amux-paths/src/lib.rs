//! Centralized path construction for the `~/.amux/` directory layout.
//!
//! Single source of truth for every path the core reads or writes. Use
//! [`Paths::resolve`] in production code and [`Paths::from_dir`] in tests.

use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("home directory not found — set $HOME environment variable")]
    HomeNotFound,
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Process-wide layout rooted at a per-user home directory (default `~/.amux`).
#[derive(Debug, Clone)]
pub struct Paths {
    home: PathBuf,
}

impl Paths {
    /// Resolve paths from the user's home directory (`~/.amux`).
    pub fn resolve() -> Result<Self, PathError> {
        let home = dirs::home_dir().ok_or(PathError::HomeNotFound)?;
        Ok(Self {
            home: home.join(".amux"),
        })
    }

    /// Build paths from an explicit base directory. Use in tests.
    pub fn from_dir(home: PathBuf) -> Self {
        Self { home }
    }

    /// The base `~/.amux` directory. Paths.Home is an ancestor of every
    /// other path returned by this type.
    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn workspaces_root(&self) -> PathBuf {
        self.home.join("workspaces")
    }

    pub fn metadata_root(&self) -> PathBuf {
        self.home.join("workspaces-metadata")
    }

    pub fn cache_root(&self) -> PathBuf {
        self.home.join("cache")
    }

    pub fn registry_path(&self) -> PathBuf {
        self.home.join("projects.json")
    }

    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.json")
    }

    pub fn linear_config_path(&self) -> PathBuf {
        self.home.join("linear.json")
    }

    pub fn github_config_path(&self) -> PathBuf {
        self.home.join("github.json")
    }

    /// Legacy roots used only by migration; never written to by the core.
    pub fn legacy_worktrees_root(&self) -> PathBuf {
        self.home.join("worktrees")
    }

    pub fn legacy_metadata_root(&self) -> PathBuf {
        self.home.join("worktrees-metadata")
    }

    pub fn workspace_metadata_dir(&self, workspace_id: &str) -> PathBuf {
        self.metadata_root().join(workspace_id)
    }

    pub fn workspace_metadata_file(&self, workspace_id: &str) -> PathBuf {
        self.workspace_metadata_dir(workspace_id).join("workspace.json")
    }

    pub fn legacy_workspace_metadata_file(&self, workspace_id: &str) -> PathBuf {
        self.legacy_metadata_root()
            .join(workspace_id)
            .join("worktree.json")
    }

    pub fn linear_cache_dir(&self, account: &str, viewer_id: &str) -> PathBuf {
        self.cache_root().join("linear").join(account).join(viewer_id)
    }

    pub fn linear_cache_file(&self, account: &str, viewer_id: &str) -> PathBuf {
        self.linear_cache_dir(account, viewer_id).join("issues.json")
    }

    /// Create `Home`, `WorkspacesRoot`, `MetadataRoot`, `CacheRoot` with mode
    /// 0755, leaving everything else to be created on demand. Never removes
    /// anything.
    pub fn ensure_directories(&self) -> Result<(), PathError> {
        for dir in [
            self.home.clone(),
            self.workspaces_root(),
            self.metadata_root(),
            self.cache_root(),
        ] {
            create_dir_0755(&dir)?;
        }
        Ok(())
    }
}

fn create_dir_0755(path: &Path) -> Result<(), PathError> {
    fs::create_dir_all(path).map_err(|e| PathError::CreateDir {
        path: path.to_path_buf(),
        source: e,
    })?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o755);
        fs::set_permissions(path, perms).map_err(|e| PathError::CreateDir {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}
