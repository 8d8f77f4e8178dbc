//! Test context for unified test setup
//!
//! Services over a fresh in-memory store and a stats double that records
//! every call it receives.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use async_trait::async_trait;
use ewm_server::config::Settings;
use ewm_server::database::{InMemoryDatabase, Stores};
use ewm_server::services::{EndpointHit, ServiceFactory, StatsClient, ViewStats};
use ewm_server::Result;

static INIT: Once = Once::new();

/// Initialize logging for tests (called once)
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Stats double serving preset views
#[derive(Default)]
pub struct RecordingStatsClient {
    views: Mutex<HashMap<String, i64>>,
    hits: Mutex<Vec<EndpointHit>>,
    pub single_calls: AtomicUsize,
    pub batch_calls: AtomicUsize,
}

impl RecordingStatsClient {
    pub fn set_views(&self, uri: &str, hits: i64) {
        self.views.lock().unwrap().insert(uri.to_string(), hits);
    }

    pub fn recorded_hits(&self) -> Vec<EndpointHit> {
        self.hits.lock().unwrap().clone()
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub fn single_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatsClient for RecordingStatsClient {
    async fn record_hit(&self, hit: &EndpointHit) -> Result<()> {
        self.hits.lock().unwrap().push(hit.clone());
        Ok(())
    }

    async fn get_views(&self, uri: &str) -> Result<i64> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.views.lock().unwrap().get(uri).copied().unwrap_or(0))
    }

    async fn get_views_batch(&self, uris: &[String]) -> Result<Vec<ViewStats>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        let views = self.views.lock().unwrap();
        Ok(uris
            .iter()
            .filter_map(|uri| {
                views.get(uri).map(|&hits| ViewStats {
                    app: "ewm-server".to_string(),
                    uri: uri.clone(),
                    hits,
                })
            })
            .collect())
    }
}

pub struct TestContext {
    pub services: ServiceFactory,
    pub stores: Stores,
    pub stats: Arc<RecordingStatsClient>,
    pub settings: Settings,
}

impl TestContext {
    pub fn new() -> Self {
        init_test_logging();

        let settings = Settings::default();
        let stores = InMemoryDatabase::new().stores();
        let stats = Arc::new(RecordingStatsClient::default());
        let services = ServiceFactory::new(settings.clone(), stores.clone(), stats.clone());

        Self {
            services,
            stores,
            stats,
            settings,
        }
    }
}
