use anyhow::Result;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::geo::GeoResult;

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    #[serde(default)]
    current: Option<CurrentWeather>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    #[serde(default)]
    temperature_2m: Option<f64>,
}

fn coord_param(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "None".to_string(),
    }
}

/// Fetches the current temperature (Celsius) for the coordinates in `geo`.
///
/// A `None` geo skips the call entirely. Null coordinates are still sent,
/// rendered as the literal `None` token; the upstream rejects such a query
/// and the result degrades to `Ok(None)` through the non-200 branch. An
/// unparseable body propagates as `Err`.
pub async fn lookup(
    client: &reqwest::Client,
    base_url: &str,
    geo: Option<&GeoResult>,
) -> Result<Option<f64>> {
    let Some(geo) = geo else {
        return Ok(None);
    };

    let url = format!(
        "{}?latitude={}&longitude={}&current=temperature_2m",
        base_url.trim_end_matches('/'),
        coord_param(geo.latitude),
        coord_param(geo.longitude)
    );
    debug!("Fetching weather: {}", url);

    let response = client.get(&url).send().await?;
    if response.status() != StatusCode::OK {
        warn!("Weather lookup returned status {}", response.status());
        return Ok(None);
    }

    let body: WeatherResponse = response.json().await?;
    Ok(body.current.and_then(|c| c.temperature_2m))
}
