use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MapError {
  #[error("config error: {0}")]
  Config(String),

  #[error("config file not found: {0}")]
  ConfigNotFound(PathBuf),

  #[error("missing required environment variable: {0}")]
  MissingEnv(&'static str),

  #[error("GitHub API responded with status: {status}")]
  UpstreamStatus { status: u16, body: String },

  #[error("GitHub API Error: {0}")]
  Graphql(String),

  #[error("project {number} not found for organization {owner}")]
  ProjectNotFound { owner: String, number: u32 },

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("yaml error: {0}")]
  Yaml(#[from] serde_yaml::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MapError>;
