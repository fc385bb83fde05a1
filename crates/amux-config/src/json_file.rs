use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::ConfigError;

/// Read and parse a JSON file, returning `T::default()` if the file is
/// missing. A present-but-malformed file is always an error.
pub(crate) fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    serde_json::from_str(&content).map_err(|e| ConfigError::Decode {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write a value as indented JSON, creating the parent directory if needed.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|e| ConfigError::Encode {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, json).map_err(|e| ConfigError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}
