use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_geo_base_url")]
    pub geo_base_url: String,
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_geo_base_url() -> String {
    "https://get.geojs.io/v1/ip/geo".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: default_host(),
            port: default_port(),
            geo_base_url: default_geo_base_url(),
            weather_base_url: default_weather_base_url(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.geo_base_url, "https://get.geojs.io/v1/ip/geo");
        assert_eq!(
            config.weather_base_url,
            "https://api.open-meteo.com/v1/forecast"
        );
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str("port: 8080\n").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.geo_base_url, "https://get.geojs.io/v1/ip/geo");
    }

    #[test]
    fn test_full_yaml() {
        let yaml = "host: 127.0.0.1\nport: 9000\ngeo_base_url: http://localhost:1/geo\nweather_base_url: http://localhost:2/forecast\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.geo_base_url, "http://localhost:1/geo");
        assert_eq!(config.weather_base_url, "http://localhost:2/forecast");
    }
}
