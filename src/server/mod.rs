mod cors;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::error::{MapError, Result};
use crate::pipeline::fetch::MapContext;

/// Upstream failure as seen by the browser: always a 500 with the cause.
struct ApiError(MapError);

impl From<MapError> for ApiError {
  fn from(e: MapError) -> Self {
    Self(e)
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    error!("error fetching GitHub data: {}", self.0);
    (
      StatusCode::INTERNAL_SERVER_ERROR,
      Json(json!({
        "error": "Failed to fetch GitHub data",
        "details": self.0.to_string(),
      })),
    )
      .into_response()
  }
}

pub fn build_router(ctx: Arc<MapContext>, allowed_origins: Vec<String>) -> Router {
  Router::new()
    .route("/api/health", get(health))
    .route("/api/github-data", get(github_data))
    .route("/api/stages", get(stages))
    .with_state(ctx)
    .layer(from_fn_with_state(Arc::new(allowed_origins), cors::cors))
}

async fn health() -> Json<Value> {
  Json(json!({ "status": "ok" }))
}

async fn github_data(
  State(ctx): State<Arc<MapContext>>,
) -> std::result::Result<Json<Value>, ApiError> {
  Ok(Json(ctx.fetch_raw().await?))
}

async fn stages(State(ctx): State<Arc<MapContext>>) -> std::result::Result<Json<Value>, ApiError> {
  let grouping = ctx.fetch_stages().await?;
  Ok(Json(json!({
    "stages": grouping.stages,
    "skipped": grouping.skipped().count(),
  })))
}

pub async fn serve(ctx: MapContext, port: u16, allowed_origins: Vec<String>) -> Result<()> {
  let app = build_router(Arc::new(ctx), allowed_origins);
  let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
  info!("server running on port {port}");

  axum::serve(listener, app)
    .with_graceful_shutdown(async {
      let _ = tokio::signal::ctrl_c().await;
      info!("shutting down");
    })
    .await?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use std::net::SocketAddr;

  use axum::http::StatusCode;

  use super::*;
  use crate::github::client::tests::{sample_project, spawn_upstream};
  use crate::pipeline::fetch::tests::context_for;

  const ORIGIN: &str = "http://localhost:3000";

  async fn spawn_app(upstream_status: StatusCode, upstream_body: String) -> SocketAddr {
    let (url, _) = spawn_upstream(upstream_status, upstream_body).await;
    let app = build_router(Arc::new(context_for(&url)), vec![ORIGIN.to_string()]);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
      .await
      .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
  }

  async fn get_json(addr: SocketAddr, path: &str) -> (u16, Value) {
    let resp = reqwest::get(format!("http://{addr}{path}"))
      .await
      .expect("request");
    let status = resp.status().as_u16();
    (status, resp.json().await.expect("json body"))
  }

  #[tokio::test]
  async fn test_health() {
    let addr = spawn_app(StatusCode::OK, "{}".into()).await;
    let (status, body) = get_json(addr, "/api/health").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "status": "ok" }));
  }

  #[tokio::test]
  async fn test_github_data_is_proxied_verbatim() {
    let addr = spawn_app(StatusCode::OK, sample_project().to_string()).await;
    let (status, body) = get_json(addr, "/api/github-data").await;
    assert_eq!(status, 200);
    assert_eq!(body, sample_project());
  }

  #[tokio::test]
  async fn test_upstream_failure_becomes_500() {
    let addr = spawn_app(StatusCode::BAD_GATEWAY, "oops".into()).await;
    let (status, body) = get_json(addr, "/api/github-data").await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Failed to fetch GitHub data");
    assert_eq!(body["details"], "GitHub API responded with status: 502");
  }

  #[tokio::test]
  async fn test_graphql_error_becomes_500() {
    let upstream = json!({ "errors": [{ "message": "Bad credentials" }] });
    let addr = spawn_app(StatusCode::OK, upstream.to_string()).await;
    let (status, body) = get_json(addr, "/api/stages").await;
    assert_eq!(status, 500);
    assert_eq!(body["details"], "GitHub API Error: Bad credentials");
  }

  #[tokio::test]
  async fn test_stages_endpoint() {
    let addr = spawn_app(StatusCode::OK, sample_project().to_string()).await;
    let (status, body) = get_json(addr, "/api/stages").await;
    assert_eq!(status, 200);
    assert_eq!(body["skipped"], 0);

    let stages = body["stages"].as_array().unwrap();
    assert_eq!(stages.len(), 2);
    assert_eq!(stages[1]["title"], "Build: Core Development");
    assert_eq!(stages[1]["issues"][0]["number"], 12);
    assert_eq!(stages[1]["issues"][0]["labels"][0]["name"], "Devnet");
    assert_eq!(stages[1]["touchpoints"], json!(["Devnet"]));
  }

  #[tokio::test]
  async fn test_cors_allows_configured_origin_only() {
    let addr = spawn_app(StatusCode::OK, "{}".into()).await;
    let client = reqwest::Client::new();

    let allowed = client
      .get(format!("http://{addr}/api/health"))
      .header("origin", ORIGIN)
      .send()
      .await
      .unwrap();
    assert_eq!(
      allowed.headers()["access-control-allow-origin"],
      ORIGIN
    );

    let denied = client
      .get(format!("http://{addr}/api/health"))
      .header("origin", "https://evil.example")
      .send()
      .await
      .unwrap();
    assert_eq!(denied.status().as_u16(), 200);
    assert!(denied.headers().get("access-control-allow-origin").is_none());
  }

  #[tokio::test]
  async fn test_cors_preflight() {
    let addr = spawn_app(StatusCode::OK, "{}".into()).await;
    let resp = reqwest::Client::new()
      .request(reqwest::Method::OPTIONS, format!("http://{addr}/api/github-data"))
      .header("origin", ORIGIN)
      .header("access-control-request-method", "GET")
      .send()
      .await
      .unwrap();
    assert_eq!(resp.status().as_u16(), 204);
    assert_eq!(
      resp.headers()["access-control-allow-methods"],
      "GET, POST"
    );
  }
}
