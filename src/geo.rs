use anyhow::Result;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

/// Resolved geolocation for a client IP. Coordinates and the place name
/// are each optional: the upstream omits fields it cannot determine.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoResult {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

/// Resolves `ip` against the geolocation service at `base_url`.
///
/// Returns `Ok(None)` when `ip` is absent or the upstream answers with any
/// status other than 200; individual missing fields in a 200 body become
/// `None` in the result. An unparseable body is the one fault that
/// propagates as `Err`.
pub async fn resolve(
    client: &reqwest::Client,
    base_url: &str,
    ip: Option<&str>,
) -> Result<Option<GeoResult>> {
    let Some(ip) = ip else {
        return Ok(None);
    };

    let url = format!("{}/{}.json", base_url.trim_end_matches('/'), ip);
    debug!("Resolving geolocation: {}", url);

    let response = client.get(&url).send().await?;
    if response.status() != StatusCode::OK {
        warn!(
            "Geolocation lookup for {} returned status {}",
            ip,
            response.status()
        );
        return Ok(None);
    }

    let body: GeoResponse = response.json().await?;
    let location_name = body.city.or(body.country);

    Ok(Some(GeoResult {
        latitude: body.latitude,
        longitude: body.longitude,
        location_name,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_resolve_none_ip_skips_call() {
        let client = reqwest::Client::new();
        // Unroutable base; a request here would error rather than return Ok
        let geo = resolve(&client, "http://127.0.0.1:1", None).await.unwrap();
        assert_eq!(geo, None);
    }

    #[tokio::test]
    async fn test_resolve_city_preferred() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/203.0.113.7.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "latitude": 40.7,
                    "longitude": -74.0,
                    "city": "New York",
                    "country": "United States"
                })
                .to_string(),
            )
            .create();

        let client = reqwest::Client::new();
        let geo = resolve(&client, &server.url(), Some("203.0.113.7"))
            .await
            .unwrap()
            .expect("expected a GeoResult");

        assert_eq!(geo.latitude, Some(40.7));
        assert_eq!(geo.longitude, Some(-74.0));
        assert_eq!(geo.location_name.as_deref(), Some("New York"));
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_country() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/203.0.113.7.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"country": "Nigeria"}).to_string())
            .create();

        let client = reqwest::Client::new();
        let geo = resolve(&client, &server.url(), Some("203.0.113.7"))
            .await
            .unwrap()
            .expect("expected a GeoResult");

        assert_eq!(geo.latitude, None);
        assert_eq!(geo.longitude, None);
        assert_eq!(geo.location_name.as_deref(), Some("Nigeria"));
    }

    #[tokio::test]
    async fn test_resolve_all_fields_missing() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/203.0.113.7.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create();

        let client = reqwest::Client::new();
        let geo = resolve(&client, &server.url(), Some("203.0.113.7"))
            .await
            .unwrap()
            .expect("expected a GeoResult");

        assert_eq!(geo.latitude, None);
        assert_eq!(geo.longitude, None);
        assert_eq!(geo.location_name, None);
    }

    #[tokio::test]
    async fn test_resolve_non_200_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/203.0.113.7.json")
            .with_status(500)
            .with_body("upstream broke")
            .create();

        let client = reqwest::Client::new();
        let geo = resolve(&client, &server.url(), Some("203.0.113.7"))
            .await
            .unwrap();
        assert_eq!(geo, None);
    }

    #[tokio::test]
    async fn test_resolve_malformed_body_is_err() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/203.0.113.7.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("not json")
            .create();

        let client = reqwest::Client::new();
        let result = resolve(&client, &server.url(), Some("203.0.113.7")).await;
        assert!(result.is_err());
    }
}
