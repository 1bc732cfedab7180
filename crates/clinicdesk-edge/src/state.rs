//! Shared state wiring for the edge service

use crate::error::Result;
use crate::types::EdgeConfig;
use crate::upstream::{LatencyProbe, UpstreamClient};
use bounded_cache::BoundedCache;
use chrono::{DateTime, Utc};
use idle_preloader::{
    detect_yield_point, module_loader, ForegroundActivity, ModuleLoader, PreloadError,
    PredictivePreloader, RouteTable,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A cache of upstream JSON documents shared between handlers and preloads
pub type SharedCache = Arc<Mutex<BoundedCache<serde_json::Value>>>;

/// Which cache instance a request goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheNamespace {
    /// General dashboard data
    Data,
    /// Patient and clinical records
    Clinical,
}

/// Shared state for the HTTP server
pub struct ServerState {
    pub data_cache: SharedCache,
    pub clinical_cache: SharedCache,
    pub upstream: Arc<UpstreamClient>,
    pub preloader: Arc<PredictivePreloader>,
    pub probe: LatencyProbe,
    pub foreground: ForegroundActivity,
    pub started_at: DateTime<Utc>,
}

pub type SharedState = Arc<ServerState>;

impl ServerState {
    pub fn cache(&self, namespace: CacheNamespace) -> &SharedCache {
        match namespace {
            CacheNamespace::Data => &self.data_cache,
            CacheNamespace::Clinical => &self.clinical_cache,
        }
    }
}

/// Build caches, upstream client, preloader and probe from configuration
pub fn build_state(config: &EdgeConfig) -> Result<SharedState> {
    let upstream = Arc::new(UpstreamClient::new(&config.upstream_url)?);
    let data_cache: SharedCache =
        Arc::new(Mutex::new(BoundedCache::new(config.data_cache.clone())));
    let clinical_cache: SharedCache =
        Arc::new(Mutex::new(BoundedCache::new(config.clinical_cache.clone())));

    let mut routes = RouteTable::new();
    for route in &config.preload_routes {
        routes.insert(
            route.clone(),
            warm_route_loader(route.clone(), upstream.clone(), data_cache.clone()),
        );
    }

    let foreground = ForegroundActivity::new();
    let preloader = Arc::new(PredictivePreloader::new(
        config.preloader.clone(),
        routes,
        detect_yield_point(Some(foreground.clone())),
    ));

    let probe_url = upstream.url_for(&config.latency_probe_path)?;
    let probe = LatencyProbe::new(upstream.client().clone(), probe_url);

    Ok(Arc::new(ServerState {
        data_cache,
        clinical_cache,
        upstream,
        preloader,
        probe,
        foreground,
        started_at: Utc::now(),
    }))
}

/// Loader that fetches a route from upstream into the data cache
fn warm_route_loader(
    route: String,
    upstream: Arc<UpstreamClient>,
    cache: SharedCache,
) -> ModuleLoader {
    module_loader(move || {
        let route = route.clone();
        let upstream = upstream.clone();
        let cache = cache.clone();
        async move {
            let value = upstream
                .fetch_json(&route)
                .await
                .map_err(|e| PreloadError::Load(e.to_string()))?;
            cache.lock().await.set(route, value);
            Ok(())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_state_from_defaults() {
        let state = build_state(&EdgeConfig::default()).unwrap();
        assert!(state.foreground.is_idle());
        assert!(!Arc::ptr_eq(
            state.cache(CacheNamespace::Data),
            state.cache(CacheNamespace::Clinical)
        ));
    }

    #[tokio::test]
    async fn test_cache_instances_use_their_config() {
        let state = build_state(&EdgeConfig::default()).unwrap();
        let data = state.cache(CacheNamespace::Data).lock().await.stats();
        let clinical = state.cache(CacheNamespace::Clinical).lock().await.stats();
        assert_eq!(data.max_size, 100);
        assert_eq!(clinical.max_size, 200);
    }

    #[test]
    fn test_build_state_rejects_bad_upstream() {
        let config = EdgeConfig {
            upstream_url: "::nonsense".to_string(),
            ..Default::default()
        };
        assert!(build_state(&config).is_err());
    }
}
