use amux_paths::Paths;
use amux_protocol::{BoardConfig, LinearAccount, ScopeFilter};
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::json_file::load_or_default;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OAuthCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
}

/// `linear.json`: accounts, the active subset, scope filter, board layout,
/// and OAuth app credentials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearConfig {
    #[serde(default)]
    pub accounts: Vec<LinearAccount>,
    #[serde(default)]
    pub active_accounts: Vec<String>,
    #[serde(default)]
    pub scope: ScopeFilter,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub oauth: OAuthCredentials,
}

impl LinearConfig {
    /// Configured accounts filtered by the active-accounts subset; an empty
    /// subset means all configured accounts are active.
    pub fn active_accounts(&self) -> Vec<&LinearAccount> {
        if self.active_accounts.is_empty() {
            self.accounts.iter().collect()
        } else {
            self.accounts
                .iter()
                .filter(|a| self.active_accounts.contains(&a.name))
                .collect()
        }
    }
}

pub fn load_linear_config(paths: &Paths) -> Result<LinearConfig, ConfigError> {
    load_or_default(&paths.linear_config_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use amux_protocol::LinearAuth;

    fn paths(dir: &tempfile::TempDir) -> Paths {
        Paths::from_dir(dir.path().join(".amux"))
    }

    #[test]
    fn test_missing_file_yields_default_linear_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = load_linear_config(&paths(&dir)).unwrap();
        assert_eq!(config, LinearConfig::default());
        assert_eq!(config.board.columns, vec!["Todo", "In Progress", "In Review", "Done"]);
        assert_eq!(config.scope.updated_within_days, 30);
    }

    #[test]
    fn test_active_accounts_empty_subset_means_all() {
        let mut config = LinearConfig::default();
        config.accounts.push(LinearAccount {
            name: "work".into(),
            auth: LinearAuth::ApiKey { key: "k".into() },
            webhook_secret: None,
        });
        config.accounts.push(LinearAccount {
            name: "personal".into(),
            auth: LinearAuth::ApiKey { key: "k2".into() },
            webhook_secret: None,
        });

        assert_eq!(config.active_accounts().len(), 2);

        config.active_accounts = vec!["work".to_string()];
        let active = config.active_accounts();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "work");
    }

    #[test]
    fn test_board_state_mapping_accepts_string_or_object() {
        let dir = tempfile::TempDir::new().unwrap();
        let p = paths(&dir);
        std::fs::create_dir_all(p.home()).unwrap();
        std::fs::write(
            p.linear_config_path(),
            r#"{"board": {"stateMapping": "auto"}}"#,
        )
        .unwrap();
        let config = load_linear_config(&p).unwrap();
        assert_eq!(
            config.board.state_mapping,
            amux_protocol::StateMapping::Auto
        );
    }
}
