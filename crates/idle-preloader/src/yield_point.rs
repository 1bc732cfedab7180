//! Suspension points between preload tasks
//!
//! Background work waits here before each task. [`IdleWait`] holds off
//! while foreground loads are in flight; [`FixedDelay`] is the fallback
//! when the host cannot report foreground activity.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_FALLBACK_DELAY: Duration = Duration::from_millis(1);
const INITIAL_IDLE_BACKOFF: Duration = Duration::from_millis(1);
const MAX_IDLE_BACKOFF: Duration = Duration::from_millis(50);

#[async_trait]
pub trait YieldPoint: Send + Sync {
    /// Resolve once it is acceptable to run the next background task
    async fn wait_for_idle(&self);
}

/// Counts foreground loads currently in flight
#[derive(Debug, Clone, Default)]
pub struct ForegroundActivity {
    in_flight: Arc<AtomicUsize>,
}

impl ForegroundActivity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a foreground load as started; it ends when the guard drops
    pub fn enter(&self) -> ForegroundGuard {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        ForegroundGuard {
            in_flight: self.in_flight.clone(),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight() == 0
    }
}

/// RAII marker for one foreground load
#[derive(Debug)]
pub struct ForegroundGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for ForegroundGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Waits until no foreground load is in flight
#[derive(Debug, Clone)]
pub struct IdleWait {
    activity: ForegroundActivity,
}

impl IdleWait {
    pub fn new(activity: ForegroundActivity) -> Self {
        Self { activity }
    }
}

#[async_trait]
impl YieldPoint for IdleWait {
    async fn wait_for_idle(&self) {
        let mut backoff = INITIAL_IDLE_BACKOFF;
        loop {
            // let already-runnable foreground tasks go first
            tokio::task::yield_now().await;
            if self.activity.is_idle() {
                return;
            }
            tokio::time::sleep(backoff).await;
            backoff = (backoff * 2).min(MAX_IDLE_BACKOFF);
        }
    }
}

/// Sleeps a fixed small delay
#[derive(Debug, Clone)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_DELAY)
    }
}

#[async_trait]
impl YieldPoint for FixedDelay {
    async fn wait_for_idle(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

/// Pick the idle-aware yield point when foreground activity is observable
pub fn detect_yield_point(activity: Option<ForegroundActivity>) -> Arc<dyn YieldPoint> {
    match activity {
        Some(activity) => Arc::new(IdleWait::new(activity)),
        None => Arc::new(FixedDelay::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[test]
    fn test_guard_tracks_in_flight() {
        let activity = ForegroundActivity::new();
        assert!(activity.is_idle());

        let a = activity.enter();
        let b = activity.enter();
        assert_eq!(activity.in_flight(), 2);

        drop(a);
        assert_eq!(activity.in_flight(), 1);
        drop(b);
        assert!(activity.is_idle());
    }

    #[tokio::test]
    async fn test_idle_wait_returns_immediately_when_idle() {
        let wait = IdleWait::new(ForegroundActivity::new());
        let result = timeout(Duration::from_secs(1), wait.wait_for_idle()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_idle_wait_blocks_during_foreground_load() {
        let activity = ForegroundActivity::new();
        let guard = activity.enter();
        let wait = IdleWait::new(activity.clone());

        let blocked = timeout(Duration::from_millis(30), wait.wait_for_idle()).await;
        assert!(blocked.is_err());

        drop(guard);
        let released = timeout(Duration::from_secs(1), wait.wait_for_idle()).await;
        assert!(released.is_ok());
    }

    #[tokio::test]
    async fn test_fixed_delay_completes() {
        let wait = FixedDelay::new(Duration::from_millis(5));
        let result = timeout(Duration::from_secs(1), wait.wait_for_idle()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_detect_yield_point() {
        let activity = ForegroundActivity::new();
        let _guard = activity.enter();

        // idle-aware: blocked while a foreground load runs
        let idle = detect_yield_point(Some(activity));
        assert!(timeout(Duration::from_millis(30), idle.wait_for_idle())
            .await
            .is_err());

        // fallback: ignores foreground activity
        let fixed = detect_yield_point(None);
        assert!(timeout(Duration::from_secs(1), fixed.wait_for_idle())
            .await
            .is_ok());
    }
}
