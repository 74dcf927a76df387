use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use skillpath::config::RelayConfig;
use tower_http::cors::CorsLayer;
use tracing::warn;

const RELAY_PATH: &str = "/api/v1/ai/relay";

#[derive(Debug, Clone)]
struct Upstream {
    url: String,
    api_key: Option<String>,
}

/// Shared client plus the upstream it forwards to, if one is configured.
#[derive(Debug, Clone)]
pub(crate) struct RelayState {
    client: reqwest::Client,
    upstream: Option<Upstream>,
}

impl RelayState {
    pub(crate) fn from_config(config: &RelayConfig) -> Result<Self, std::io::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(std::io::Error::other)?;

        let upstream = config.upstream_url.as_ref().map(|url| Upstream {
            url: url.clone(),
            api_key: config.api_key.clone(),
        });

        Ok(Self { client, upstream })
    }
}

/// Browser-facing relay for generative-text requests. CORS is permissive so
/// the web client can call it from any origin.
pub(crate) fn relay_router(state: RelayState) -> Router {
    Router::new()
        .route(RELAY_PATH, post(relay_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn relay_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub(crate) async fn relay_handler(
    State(relay): State<RelayState>,
    Json(payload): Json<Value>,
) -> Response {
    let Some(upstream) = relay.upstream.as_ref() else {
        return relay_error(StatusCode::SERVICE_UNAVAILABLE, "ai relay is not configured");
    };

    let mut request = relay.client.post(&upstream.url).json(&payload);
    if let Some(key) = &upstream.api_key {
        request = request.bearer_auth(key);
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, "ai relay upstream unreachable");
            return relay_error(StatusCode::BAD_GATEWAY, "ai relay upstream unreachable");
        }
    };

    let status =
        StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/json")
        .to_string();

    let body = match response.bytes().await {
        Ok(body) => body,
        Err(err) => {
            warn!(error = %err, "ai relay upstream body unreadable");
            return relay_error(StatusCode::BAD_GATEWAY, "ai relay upstream body unreadable");
        }
    };

    if !status.is_success() {
        warn!(%status, "ai relay upstream returned an error");
    }

    (status, [(header::CONTENT_TYPE, content_type)], body.to_vec()).into_response()
}
