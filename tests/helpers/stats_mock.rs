//! Mock stats service for testing
//!
//! A wiremock server speaking the stats HTTP API: `POST /hit` and
//! `GET /stats`.

use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};
use ewm_server::config::StatsConfig;
use ewm_server::services::HttpStatsClient;

pub struct StatsMockServer {
    pub server: MockServer,
}

impl StatsMockServer {
    pub async fn new() -> Self {
        Self { server: MockServer::start().await }
    }

    pub fn config(&self) -> StatsConfig {
        StatsConfig {
            url: self.server.uri(),
            timeout_seconds: 2,
        }
    }

    pub fn client(&self) -> HttpStatsClient {
        HttpStatsClient::new(&self.config()).expect("Failed to build stats client")
    }

    /// Accept every hit, expecting exactly `times` of them
    pub async fn mock_hit(&self, times: u64) {
        Mock::given(method("POST"))
            .and(path("/hit"))
            .respond_with(ResponseTemplate::new(201))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Answer `/stats` with the given `(uri, hits)` pairs, expecting `times` calls
    pub async fn mock_stats(&self, stats: &[(&str, i64)], times: u64) {
        let body: Vec<Value> = stats
            .iter()
            .map(|(uri, hits)| json!({ "app": "ewm-server", "uri": uri, "hits": hits }))
            .collect();

        Mock::given(method("GET"))
            .and(path("/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_stats_error(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/stats"))
            .respond_with(ResponseTemplate::new(status).set_body_string("stats exploded"))
            .mount(&self.server)
            .await;
    }

    /// Every request the server received so far
    pub async fn received(&self) -> Vec<wiremock::Request> {
        self.server.received_requests().await.unwrap_or_default()
    }
}
