use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use tracing::{debug, error, info};

use crate::error::{MapError, Result};
use crate::github::query::GraphQLPayload;
use crate::github::types::{GraphQLResponse, ProjectData, ProjectSnapshot};

const CLIENT_USER_AGENT: &str = concat!("journey-map/", env!("CARGO_PKG_VERSION"));

pub struct GitHubClient {
  http: reqwest::Client,
  token: String,
  graphql_url: String,
}

impl GitHubClient {
  pub fn new(token: &str, graphql_url: &str) -> Result<Self> {
    let http = reqwest::Client::builder()
      .build()
      .map_err(|e| MapError::Config(format!("failed to build http client: {e}")))?;

    Ok(Self {
      http,
      token: token.to_string(),
      graphql_url: graphql_url.to_string(),
    })
  }

  /// Runs the project query and returns the response body untouched, after
  /// checking the HTTP status and the GraphQL `errors` array.
  pub async fn fetch_project_raw(&self, owner: &str, number: u32) -> Result<serde_json::Value> {
    info!("fetching project {number} for {owner}");

    let response = self
      .http
      .post(&self.graphql_url)
      .header(AUTHORIZATION, format!("Bearer {}", self.token))
      .header(USER_AGENT, CLIENT_USER_AGENT)
      .header(ACCEPT, "application/json")
      .json(&GraphQLPayload::project(owner, number))
      .send()
      .await?;

    let status = response.status();
    debug!("GitHub API response status: {status}");
    let body = response.text().await?;

    if !status.is_success() {
      error!("GitHub API error response: {body}");
      return Err(MapError::UpstreamStatus {
        status: status.as_u16(),
        body,
      });
    }

    let value: serde_json::Value = serde_json::from_str(&body)?;
    if let Some(message) = value
      .get("errors")
      .and_then(|e| e.as_array())
      .and_then(|errors| errors.first())
    {
      let message = message
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("unknown error");
      error!("GitHub GraphQL error: {message}");
      return Err(MapError::Graphql(message.to_string()));
    }

    Ok(value)
  }

  pub async fn fetch_project(&self, owner: &str, number: u32) -> Result<ProjectSnapshot> {
    let raw = self.fetch_project_raw(owner, number).await?;
    let response: GraphQLResponse<ProjectData> = serde_json::from_value(raw)?;
    let snapshot = ProjectSnapshot::from_response(response, owner, number)?;

    info!(
      "found {} issue(s), {} field(s), {} rejected item(s)",
      snapshot.issues.len(),
      snapshot.fields.len(),
      snapshot.rejected
    );
    Ok(snapshot)
  }
}
