//! Stats service client
//!
//! Records endpoint hits and reads back view counts. Views are always asked
//! for over the whole history (`now - 100 years` to `now`) with
//! `unique=false`.

use std::time::Duration;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;
use url::Url;
use crate::config::StatsConfig;
use crate::utils::errors::{EwmError, Result, StatsError};
use crate::utils::helpers::format_timestamp;
use crate::utils::logging::log_api_error;

const HISTORY_YEARS: i64 = 100;

/// One recorded access to a public endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointHit {
    pub app: String,
    pub uri: String,
    pub ip: String,
    #[serde(serialize_with = "serialize_stats_timestamp")]
    pub timestamp: DateTime<Utc>,
}

fn serialize_stats_timestamp<S: Serializer>(timestamp: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(*timestamp))
}

/// Aggregated hits of one uri
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewStats {
    pub app: String,
    pub uri: String,
    pub hits: i64,
}

#[async_trait]
pub trait StatsClient: Send + Sync {
    async fn record_hit(&self, hit: &EndpointHit) -> Result<()>;

    /// Hits of a single uri, 0 when the service knows nothing about it
    async fn get_views(&self, uri: &str) -> Result<i64>;

    /// Hits of many uris in one request; uris without hits are absent
    async fn get_views_batch(&self, uris: &[String]) -> Result<Vec<ViewStats>>;
}

/// reqwest-backed client for the stats HTTP API
#[derive(Debug, Clone)]
pub struct HttpStatsClient {
    client: Client,
    base_url: Url,
}

impl HttpStatsClient {
    pub fn new(config: &StatsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("ewm-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url(&config.url)?,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn fetch_stats(&self, uris: &[String]) -> Result<Vec<ViewStats>> {
        let now = Utc::now();
        let start = now - chrono::Duration::days(365 * HISTORY_YEARS);

        let mut query = vec![
            ("start", format_timestamp(start)),
            ("end", format_timestamp(now)),
            ("unique", "false".to_string()),
        ];
        query.extend(uris.iter().map(|uri| ("uris", uri.clone())));

        let url = self.endpoint("stats")?;
        debug!(url = %url, uris = uris.len(), "Requesting view stats");

        let response = self.client
            .get(url)
            .query(&query)
            .send()
            .await
            .map_err(|e| request_error("stats", e))?;

        let response = ensure_success("stats", response).await?;
        response.json::<Vec<ViewStats>>().await.map_err(|e| {
            log_api_error("stats", &e.to_string(), Some("decoding view stats"));
            EwmError::Stats(StatsError::InvalidResponse(e.to_string()))
        })
    }
}

/// Endpoints are joined relative to the base, so its path must end with `/`
fn base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn request_error(api: &str, error: reqwest::Error) -> EwmError {
    log_api_error(api, &error.to_string(), None);
    let stats_error = if error.is_timeout() {
        StatsError::Timeout
    } else if error.is_connect() {
        StatsError::ServiceUnavailable
    } else {
        StatsError::RequestFailed(error.to_string())
    };
    EwmError::Stats(stats_error)
}

async fn ensure_success(api: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    log_api_error(api, &format!("HTTP {}", status), Some(body.as_str()));
    Err(EwmError::Stats(StatsError::RequestFailed(format!("HTTP {}: {}", status, body))))
}

#[async_trait]
impl StatsClient for HttpStatsClient {
    async fn record_hit(&self, hit: &EndpointHit) -> Result<()> {
        let url = self.endpoint("hit")?;
        debug!(uri = %hit.uri, ip = %hit.ip, "Recording endpoint hit");

        let response = self.client
            .post(url)
            .json(hit)
            .send()
            .await
            .map_err(|e| request_error("hit", e))?;

        ensure_success("hit", response).await?;
        Ok(())
    }

    async fn get_views(&self, uri: &str) -> Result<i64> {
        let stats = self.fetch_stats(&[uri.to_string()]).await?;
        Ok(stats.first().map(|s| s.hits).unwrap_or(0))
    }

    async fn get_views_batch(&self, uris: &[String]) -> Result<Vec<ViewStats>> {
        if uris.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_stats(uris).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::helpers::parse_timestamp;

    #[test]
    fn test_hit_serializes_timestamp_in_stats_format() {
        let hit = EndpointHit {
            app: "ewm-server".to_string(),
            uri: "/events/1".to_string(),
            ip: "10.0.0.1".to_string(),
            timestamp: parse_timestamp("2024-05-01 12:00:00").unwrap(),
        };
        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(json["timestamp"], "2024-05-01 12:00:00");
        assert_eq!(json["uri"], "/events/1");
    }

    #[test]
    fn test_view_stats_deserialization() {
        let json = r#"[{"app": "ewm-server", "uri": "/events/4", "hits": 17}]"#;
        let stats: Vec<ViewStats> = serde_json::from_str(json).unwrap();
        assert_eq!(stats[0].hits, 17);
    }

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let base = base_url("http://gateway:8080/stats-svc").unwrap();
        assert_eq!(base.join("stats").unwrap().as_str(), "http://gateway:8080/stats-svc/stats");
        let root = base_url("http://localhost:9090").unwrap();
        assert_eq!(root.join("hit").unwrap().as_str(), "http://localhost:9090/hit");
    }

    #[test]
    fn test_client_rejects_malformed_base_url() {
        let config = StatsConfig { url: "not a url".to_string(), timeout_seconds: 1 };
        assert!(HttpStatsClient::new(&config).is_err());
    }
}
