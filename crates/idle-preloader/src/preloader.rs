//! Predictive preloader
//!
//! Queues warm-up loads, runs them one at a time at idle yield points, and
//! queues the most visited routes after every recorded interaction.
//! Failures are logged and dropped; nothing here affects the foreground
//! path.

use crate::error::PreloadError;
use crate::history::InteractionHistory;
use crate::loader::{ModuleLoader, RouteTable};
use crate::types::{PreloadReport, PreloaderConfig, PreloaderStats};
use crate::yield_point::YieldPoint;
use futures::FutureExt;
use std::collections::{HashSet, VecDeque};
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A queued warm-up load
struct PreloadTask {
    module_id: String,
    loader: ModuleLoader,
}

struct PreloaderState {
    queue: VecDeque<PreloadTask>,
    /// Ids currently in `queue` or executing
    queued: HashSet<String>,
    loaded: HashSet<String>,
    history: InteractionHistory,
    failed: u64,
}

/// Idle-time module preloader biased toward frequently visited routes
pub struct PredictivePreloader {
    config: PreloaderConfig,
    routes: RouteTable,
    yield_point: Arc<dyn YieldPoint>,
    state: Mutex<PreloaderState>,
    draining: AtomicBool,
    work_ready: Notify,
}

/// Clears the draining flag even if the drain future is dropped
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl PredictivePreloader {
    pub fn new(
        config: PreloaderConfig,
        routes: RouteTable,
        yield_point: Arc<dyn YieldPoint>,
    ) -> Self {
        let history = InteractionHistory::new(config.history_capacity);
        Self {
            config,
            routes,
            yield_point,
            state: Mutex::new(PreloaderState {
                queue: VecDeque::new(),
                queued: HashSet::new(),
                loaded: HashSet::new(),
                history,
                failed: 0,
            }),
            draining: AtomicBool::new(false),
            work_ready: Notify::new(),
        }
    }

    /// Queue a load unless the module is already loaded or queued.
    /// Returns whether a task was added.
    pub async fn queue_preload(&self, module_id: impl Into<String>, loader: ModuleLoader) -> bool {
        let module_id = module_id.into();
        {
            let mut state = self.state.lock().await;
            if state.loaded.contains(&module_id) || state.queued.contains(&module_id) {
                return false;
            }
            state.queued.insert(module_id.clone());
            state.queue.push_back(PreloadTask {
                module_id: module_id.clone(),
                loader,
            });
        }

        debug!(module_id = %module_id, "Queued preload");
        self.work_ready.notify_one();
        true
    }

    /// Drain the queue, one task per idle yield point.
    ///
    /// Only one drain runs at a time; a concurrent call returns an empty
    /// report immediately.
    pub async fn start_preloading(&self) -> PreloadReport {
        let mut report = PreloadReport::default();

        if self.draining.swap(true, Ordering::AcqRel) {
            debug!("Preload drain already running");
            return report;
        }

        {
            let _guard = DrainGuard(&self.draining);
            loop {
                if self.state.lock().await.queue.is_empty() {
                    break;
                }

                self.yield_point.wait_for_idle().await;

                let Some(task) = self.state.lock().await.queue.pop_front() else {
                    break;
                };

                // Lock is not held while the loader runs. A panicking loader
                // counts as a failed load.
                let loader = &task.loader;
                let outcome = AssertUnwindSafe(async move { loader().await })
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| Err(PreloadError::Load("loader panicked".to_string())));

                let mut state = self.state.lock().await;
                state.queued.remove(&task.module_id);
                match outcome {
                    Ok(()) => {
                        debug!(module_id = %task.module_id, "Preloaded module");
                        state.loaded.insert(task.module_id.clone());
                        report.loaded.push(task.module_id);
                    }
                    Err(e) => {
                        warn!(module_id = %task.module_id, error = %e, "Preload failed");
                        state.failed += 1;
                        report.failed.push(task.module_id);
                    }
                }
            }
        }

        // Work queued while another caller held the drain flag
        if !self.state.lock().await.queue.is_empty() {
            self.work_ready.notify_one();
        }

        if !report.is_empty() {
            info!(
                loaded = report.loaded.len(),
                failed = report.failed.len(),
                "Preload drain finished"
            );
        }
        report
    }

    /// Record a navigation and queue the most visited routes.
    /// Returns the module ids newly queued.
    pub async fn track_interaction(&self, route: impl Into<String>) -> Vec<String> {
        let ranked = {
            let mut state = self.state.lock().await;
            state.history.record(route);
            state.history.ranked()
        };

        let mut queued = Vec::new();
        for (route, count) in ranked.into_iter().take(self.config.top_n) {
            let Some(loader) = self.routes.get(&route) else {
                debug!(route = %route, "No loader registered for route");
                continue;
            };
            if self.queue_preload(route.clone(), loader.clone()).await {
                debug!(route = %route, count, "Queued frequent route");
                queued.push(route);
            }
        }
        queued
    }

    /// Run a background task that drains whenever work is queued
    pub fn spawn_worker(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                self.work_ready.notified().await;
                self.start_preloading().await;
            }
        })
    }

    pub async fn is_loaded(&self, module_id: &str) -> bool {
        self.state.lock().await.loaded.contains(module_id)
    }

    /// Module ids waiting in the queue, in execution order
    pub async fn pending(&self) -> Vec<String> {
        self.state
            .lock()
            .await
            .queue
            .iter()
            .map(|t| t.module_id.clone())
            .collect()
    }

    pub async fn stats(&self) -> PreloaderStats {
        let state = self.state.lock().await;
        PreloaderStats {
            queued: state.queue.len(),
            loaded: state.loaded.len(),
            failed: state.failed,
            history_len: state.history.len(),
        }
    }
}
