use crate::config::Config;
use crate::geo;
use crate::models::{ErrorDetail, ErrorResponse, HelloResponse};
use crate::weather;
use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct AppState {
    pub http_client: Arc<reqwest::Client>,
    pub config: Arc<Config>,
}

#[derive(Debug, Deserialize)]
pub struct HelloParams {
    visitor_name: Option<String>,
}

/// Strips every leading and trailing quote character, single or double,
/// in any combination. Not a matched-pair unquote.
fn strip_quotes(name: &str) -> &str {
    name.trim_matches(|c| c == '\'' || c == '"')
}

/// Nulls render as the literal `None` token inside the greeting.
fn null_token<T: std::fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "None".to_string(),
    }
}

fn upstream_fault_response(err: anyhow::Error) -> axum::response::Response {
    let error_response = ErrorResponse {
        error: ErrorDetail {
            message: format!("Upstream returned an unreadable response: {}", err),
            r#type: "api_error".to_string(),
            code: Some("parse_error".to_string()),
        },
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)).into_response()
}

#[axum_macros::debug_handler]
pub async fn hello(
    State(state): State<AppState>,
    Query(params): Query<HelloParams>,
    headers: HeaderMap,
) -> axum::response::Response {
    let visitor_name = params.visitor_name.as_deref().unwrap_or("User");
    let visitor_name = strip_quotes(visitor_name);

    // Trust-the-proxy client IP, not a verified source address
    let client_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("127.0.0.1")
        .to_string();
    debug!("Greeting {} at {}", visitor_name, client_ip);

    let geo = match geo::resolve(
        &state.http_client,
        &state.config.geo_base_url,
        Some(&client_ip),
    )
    .await
    {
        Ok(geo) => geo,
        Err(e) => {
            warn!("Geolocation resolution faulted: {}", e);
            return upstream_fault_response(e);
        }
    };

    // Attempted whenever a geo result exists, even with null coordinates
    let temperature = match weather::lookup(
        &state.http_client,
        &state.config.weather_base_url,
        geo.as_ref(),
    )
    .await
    {
        Ok(temperature) => temperature,
        Err(e) => {
            warn!("Weather lookup faulted: {}", e);
            return upstream_fault_response(e);
        }
    };

    let location = geo.and_then(|g| g.location_name);
    let greeting = format!(
        "Hello, {}!, the temperature is {} degrees Celcius in {}",
        visitor_name,
        null_token(&temperature),
        null_token(&location)
    );

    let response = HelloResponse {
        client_ip,
        location,
        greeting,
    };
    (StatusCode::OK, Json(response)).into_response()
}
