//! HTTP server for the edge endpoints
//!
//! Provides /health, read-through /data and /clinical, /navigate and
//! /media/variant.

use crate::state::{CacheNamespace, SharedState};
use crate::types::{HealthResponse, NavigateResponse, VariantQuery, VariantResponse};
use adaptive_media::{select_image_variant, select_quality, QualityTier};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/data", axum::routing::delete(clear_data))
        .route("/data/{*path}", get(get_data).delete(delete_data))
        .route("/clinical", axum::routing::delete(clear_clinical))
        .route("/clinical/{*path}", get(get_clinical).delete(delete_clinical))
        .route("/navigate/{*route}", post(navigate))
        .route("/media/variant", get(media_variant))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: SharedState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let data_cache = state.data_cache.lock().await.stats();
    let clinical_cache = state.clinical_cache.lock().await.stats();
    let preloader = state.preloader.stats().await;
    let uptime_secs = (Utc::now() - state.started_at).num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        foreground_in_flight: state.foreground.in_flight(),
        data_cache,
        clinical_cache,
        preloader,
    })
}

async fn get_data(State(state): State<SharedState>, Path(path): Path<String>) -> Response {
    read_through(&state, CacheNamespace::Data, path).await
}

async fn get_clinical(State(state): State<SharedState>, Path(path): Path<String>) -> Response {
    read_through(&state, CacheNamespace::Clinical, path).await
}

async fn delete_data(State(state): State<SharedState>, Path(path): Path<String>) -> StatusCode {
    invalidate(&state, CacheNamespace::Data, &path).await
}

async fn delete_clinical(State(state): State<SharedState>, Path(path): Path<String>) -> StatusCode {
    invalidate(&state, CacheNamespace::Clinical, &path).await
}

async fn clear_data(State(state): State<SharedState>) -> StatusCode {
    state.cache(CacheNamespace::Data).lock().await.clear();
    info!("Cleared data cache");
    StatusCode::NO_CONTENT
}

async fn clear_clinical(State(state): State<SharedState>) -> StatusCode {
    state.cache(CacheNamespace::Clinical).lock().await.clear();
    info!("Cleared clinical cache");
    StatusCode::NO_CONTENT
}

/// Serve from cache, falling back to upstream and caching the result
async fn read_through(state: &SharedState, namespace: CacheNamespace, path: String) -> Response {
    let cache = state.cache(namespace);

    let cached = cache.lock().await.get(&path).cloned();
    if let Some(value) = cached {
        return ([("X-Cache", "HIT")], Json(value)).into_response();
    }

    // Counts as foreground work so idle preloads hold off
    let _foreground = state.foreground.enter();

    match state.upstream.fetch_json(&path).await {
        Ok(value) => {
            cache.lock().await.set(path, value.clone());
            ([("X-Cache", "MISS")], Json(value)).into_response()
        }
        Err(e) => {
            warn!(path = %path, namespace = ?namespace, error = %e, "Upstream fetch failed");
            (
                e.status_code(),
                Json(ErrorResponse {
                    error: "Upstream unavailable".to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn invalidate(state: &SharedState, namespace: CacheNamespace, path: &str) -> StatusCode {
    let removed = state.cache(namespace).lock().await.delete(path);
    debug!(path = %path, namespace = ?namespace, removed, "Invalidated cache entry");
    StatusCode::NO_CONTENT
}

/// Record a navigation event for predictive preloading
async fn navigate(
    State(state): State<SharedState>,
    Path(route): Path<String>,
) -> Json<NavigateResponse> {
    let route = route.trim_matches('/').to_string();
    let queued = state.preloader.track_interaction(route.clone()).await;
    Json(NavigateResponse { route, queued })
}

/// Resolve the media variant for the caller's viewport and network
async fn media_variant(
    State(state): State<SharedState>,
    Query(query): Query<VariantQuery>,
) -> Json<VariantResponse> {
    let viewport = query.viewport.as_deref().and_then(|v| v.trim().parse().ok());
    let user_override = QualityTier::parse(query.quality.as_deref().unwrap_or("auto"));

    let latency_ms = match query.latency_ms.as_deref() {
        Some(raw) => raw.trim().parse::<f64>().ok(),
        None if user_override == QualityTier::Auto => state.probe.measure().await,
        None => None,
    };

    let tier = select_quality(latency_ms, user_override);
    let variant = select_image_variant(viewport, tier);

    Json(VariantResponse {
        tier,
        latency_ms,
        variant,
        content_type: variant.format.mime_type().to_string(),
    })
}
