use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::journey::group::DEFAULT_PAIN_POINT_OPTION_ID;

pub const ENV_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_OWNER: &str = "GITHUB_OWNER";
pub const ENV_REPO: &str = "GITHUB_REPO";
pub const ENV_PROJECT_NUMBER: &str = "GITHUB_PROJECT_NUMBER";
pub const ENV_PORT: &str = "PORT";

const REQUIRED_ENV: [&str; 4] = [ENV_TOKEN, ENV_OWNER, ENV_REPO, ENV_PROJECT_NUMBER];

#[derive(Debug, Clone)]
pub struct Config {
  pub github: GitHubTarget,
  pub settings: Settings,
}

/// Where the project lives and how to authenticate against it.
#[derive(Clone)]
pub struct GitHubTarget {
  pub token: String,
  pub owner: String,
  pub repo: String,
  pub project_number: u32,
}

impl std::fmt::Debug for GitHubTarget {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("GitHubTarget")
      .field("token", &"<redacted>")
      .field("owner", &self.owner)
      .field("repo", &self.repo)
      .field("project_number", &self.project_number)
      .finish()
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
  #[serde(default = "default_port")]
  pub port: u16,
  #[serde(default = "default_graphql_url")]
  pub graphql_url: String,
  #[serde(default = "default_allowed_origins")]
  pub allowed_origins: Vec<String>,
  #[serde(default = "default_pain_point_option_id")]
  pub pain_point_option_id: String,
  /// YAML file replacing the built-in stage metadata table.
  #[serde(default)]
  pub metadata_file: Option<PathBuf>,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      port: default_port(),
      graphql_url: default_graphql_url(),
      allowed_origins: default_allowed_origins(),
      pain_point_option_id: default_pain_point_option_id(),
      metadata_file: None,
    }
  }
}

fn default_port() -> u16 {
  3001
}
fn default_graphql_url() -> String {
  "https://api.github.com/graphql".to_string()
}
fn default_allowed_origins() -> Vec<String> {
  vec!["http://localhost:3000".to_string()]
}
fn default_pain_point_option_id() -> String {
  DEFAULT_PAIN_POINT_OPTION_ID.to_string()
}

pub const DEFAULT_SETTINGS_FILE: &str = "journey-map.yaml";

impl Settings {
  /// An explicitly requested file must exist; the default file is optional.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    let (path, explicit) = match path {
      Some(p) => (p.to_path_buf(), true),
      None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
    };

    if !path.exists() {
      if explicit {
        return Err(MapError::ConfigNotFound(path));
      }
      return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let mut settings: Settings = serde_yaml::from_str(&content)?;
    settings.validate()?;

    // Relative metadata paths are relative to the settings file.
    if let Some(dir) = path.parent() {
      settings.metadata_file = settings
        .metadata_file
        .take()
        .map(|file| if file.is_relative() { dir.join(file) } else { file });
    }
    Ok(settings)
  }

  fn validate(&self) -> Result<()> {
    if self.graphql_url.is_empty() {
      return Err(MapError::Config("graphql_url must not be empty".into()));
    }
    if self.pain_point_option_id.is_empty() {
      return Err(MapError::Config(
        "pain_point_option_id must not be empty".into(),
      ));
    }
    Ok(())
  }
}

impl Config {
  pub fn load(settings_path: Option<&Path>) -> Result<Self> {
    let settings = Settings::load(settings_path)?;
    Self::from_lookup(|key| std::env::var(key).ok(), settings)
  }

  /// Builds the config from an arbitrary variable source. Empty values count
  /// as missing.
  pub fn from_lookup<F>(lookup: F, mut settings: Settings) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    for key in REQUIRED_ENV {
      if get(key).is_none() {
        return Err(MapError::MissingEnv(key));
      }
    }

    let raw_number = get(ENV_PROJECT_NUMBER).unwrap_or_default();
    let project_number: u32 = raw_number.trim().parse().map_err(|_| {
      MapError::Config(format!(
        "{ENV_PROJECT_NUMBER} must be a positive integer: {raw_number}"
      ))
    })?;
    if project_number == 0 {
      return Err(MapError::Config(format!(
        "{ENV_PROJECT_NUMBER} must be a positive integer: {raw_number}"
      )));
    }

    if let Some(port) = get(ENV_PORT) {
      settings.port = port
        .trim()
        .parse()
        .map_err(|_| MapError::Config(format!("{ENV_PORT} is not a valid port: {port}")))?;
    }

    Ok(Self {
      github: GitHubTarget {
        token: get(ENV_TOKEN).unwrap_or_default(),
        owner: get(ENV_OWNER).unwrap_or_default(),
        repo: get(ENV_REPO).unwrap_or_default(),
        project_number,
      },
      settings,
    })
  }
}
