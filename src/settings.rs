use std::{
    env,
    path::{Path, PathBuf},
};

use config::{Config, ConfigError, Environment, File};
use glob::glob;
use serde_derive::Deserialize;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
const TOKEN_VAR: &str = "GITHUB_TOKEN";

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_batch_path() -> String {
    "batches/issues.toml".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct Github {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub repo: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for Github {
    fn default() -> Self {
        Self {
            token: String::new(),
            repo: String::new(),
            api_base: default_api_base(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BatchSource {
    #[serde(default = "default_batch_path")]
    pub path: String,
}

impl Default for BatchSource {
    fn default() -> Self {
        Self {
            path: default_batch_path(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub github: Github,
    #[serde(default)]
    pub batch: BatchSource,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::from_dir(&cwd)
    }

    pub fn from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let dir = dir.display().to_string();

        debug!(
            "Looking for configuration file {dir}/config and/or configuration files in {dir}{}",
            "/config/"
        );

        let config_files = glob(&format!("{dir}/config/*"))
            .map_err(|e| ConfigError::Message(e.to_string()))?
            .filter_map(Result::ok)
            .map(File::from)
            .collect::<Vec<_>>();

        let config = Config::builder()
            .add_source(File::with_name(&format!("{dir}/config")).required(false))
            .add_source(config_files)
            .add_source(Environment::with_prefix("ISSUEBATCH").separator("__"))
            .set_override_option("github.token", env::var(TOKEN_VAR).ok())?
            .build()?;

        config.try_deserialize()
    }
}
