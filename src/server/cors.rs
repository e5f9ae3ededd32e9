use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{
  ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN,
  VARY,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

const ALLOW_METHODS: &str = "GET, POST";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";

pub type AllowedOrigins = Arc<Vec<String>>;

/// Echoes the request origin back when it is on the allow list. Preflight
/// requests are answered here without reaching the router.
pub async fn cors(State(allowed): State<AllowedOrigins>, req: Request, next: Next) -> Response {
  let origin = req
    .headers()
    .get(ORIGIN)
    .filter(|o| {
      o.to_str()
        .map(|o| allowed.iter().any(|a| a == o))
        .unwrap_or(false)
    })
    .cloned();

  let mut response = if req.method() == Method::OPTIONS {
    StatusCode::NO_CONTENT.into_response()
  } else {
    next.run(req).await
  };

  if let Some(origin) = origin {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
      ACCESS_CONTROL_ALLOW_METHODS,
      HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
      ACCESS_CONTROL_ALLOW_HEADERS,
      HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.append(VARY, HeaderValue::from_static("Origin"));
  }

  response
}
