use tracing::{info, warn};

use crate::config::{Config, GitHubTarget, Settings};
use crate::error::Result;
use crate::github::client::GitHubClient;
use crate::journey::group::{group_issues_by_stage, ClassificationPolicy, Grouping};
use crate::journey::metadata::MetadataTable;

/// The configured metadata file, or the built-in table.
pub fn load_metadata(settings: &Settings) -> Result<MetadataTable> {
  let table = match &settings.metadata_file {
    Some(path) => MetadataTable::load(path)?,
    None => MetadataTable::builtin(),
  };
  if table.is_empty() {
    warn!("stage metadata table is empty, every stage uses the default color");
  }
  Ok(table)
}

/// Everything needed to turn the configured project into stages. Built once
/// per process and shared read-only.
pub struct MapContext {
  pub client: GitHubClient,
  pub target: GitHubTarget,
  pub metadata: MetadataTable,
  pub policy: ClassificationPolicy,
}

impl MapContext {
  pub fn from_config(config: &Config) -> Result<Self> {
    let metadata = load_metadata(&config.settings)?;
    info!("stage metadata: {} entries", metadata.len());

    Ok(Self {
      client: GitHubClient::new(&config.github.token, &config.settings.graphql_url)?,
      target: config.github.clone(),
      metadata,
      policy: ClassificationPolicy::with_pain_point(&config.settings.pain_point_option_id),
    })
  }

  pub async fn fetch_raw(&self) -> Result<serde_json::Value> {
    self
      .client
      .fetch_project_raw(&self.target.owner, self.target.project_number)
      .await
  }

  /// Fetches the project and groups its issues by journey stage.
  pub async fn fetch_stages(&self) -> Result<Grouping> {
    let snapshot = self
      .client
      .fetch_project(&self.target.owner, self.target.project_number)
      .await?;

    let stage_field = snapshot.field(&self.policy.stage_field).cloned();
    Ok(group_issues_by_stage(
      snapshot.issues,
      stage_field.as_ref(),
      &self.metadata,
      &self.policy,
    ))
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use axum::http::StatusCode;

  use super::*;
  use crate::config::Settings;
  use crate::error::MapError;
  use crate::github::client::tests::{sample_project, spawn_upstream};

  pub(crate) fn context_for(url: &str) -> MapContext {
    let settings = Settings {
      graphql_url: url.to_string(),
      ..Settings::default()
    };
    let config = Config::from_lookup(
      |key| match key {
        "GITHUB_TOKEN" => Some("ghp_test".into()),
        "GITHUB_OWNER" => Some("acme".into()),
        "GITHUB_REPO" => Some("experience-map".into()),
        "GITHUB_PROJECT_NUMBER" => Some("1".into()),
        _ => None,
      },
      settings,
    )
    .unwrap();
    MapContext::from_config(&config).unwrap()
  }

  #[tokio::test]
  async fn test_fetch_stages_end_to_end() {
    let (url, _) = spawn_upstream(StatusCode::OK, sample_project().to_string()).await;
    let ctx = context_for(&url);

    let grouping = ctx.fetch_stages().await.unwrap();
    assert_eq!(grouping.stages.len(), 2);
    assert_eq!(grouping.stages[0].title, "Discovery");
    assert!(grouping.stages[0].issues.is_empty());

    let build = &grouping.stages[1];
    assert_eq!(build.description, "Writing code");
    assert_eq!(build.color, "#DCCCFF");
    assert_eq!(build.issues.len(), 1);
    assert_eq!(build.issues[0].number, 12);
    assert_eq!(build.touchpoints, vec!["Devnet"]);
  }

  #[tokio::test]
  async fn test_project_without_stage_field_has_no_stages() {
    let body = serde_json::json!({
      "data": { "organization": { "projectV2": {
        "fields": { "nodes": [{ "name": "Title", "dataType": "TITLE" }] },
        "items": { "nodes": [] }
      }}}
    });
    let (url, _) = spawn_upstream(StatusCode::OK, body.to_string()).await;

    let grouping = context_for(&url).fetch_stages().await.unwrap();
    assert!(grouping.stages.is_empty());
  }

  #[test]
  fn test_missing_metadata_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
      metadata_file: Some(dir.path().join("stages.yaml")),
      ..Settings::default()
    };
    let config = Config::from_lookup(
      |key| match key {
        "GITHUB_TOKEN" | "GITHUB_OWNER" | "GITHUB_REPO" => Some("x".into()),
        "GITHUB_PROJECT_NUMBER" => Some("1".into()),
        _ => None,
      },
      settings,
    )
    .unwrap();
    let err = MapContext::from_config(&config).err().unwrap();
    assert!(
      matches!(err, MapError::ConfigNotFound(ref p) if p.ends_with("stages.yaml")),
      "unexpected error: {err}"
    );
  }
}
