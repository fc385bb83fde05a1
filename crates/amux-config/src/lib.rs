//! JSON configuration loading for `config.json`, `.amux/project.json`, and
//! `linear.json`.
//!
//! A missing file is never an error — callers get a default value. A
//! present-but-malformed file always is. `Config` additionally preserves
//! unknown top-level keys across a load→save round trip.

mod config;
mod errors;
mod json_file;
mod linear;
mod project;

pub use config::{Config, UiConfig, load_config, save_config};
pub use errors::ConfigError;
pub use linear::{LinearConfig, OAuthCredentials, load_linear_config};
pub use project::{ProjectConfig, load_project_config};
