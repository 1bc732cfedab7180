//! Idle-time predictive preloader
//!
//! Defers warm-up loads of application modules to idle yield points,
//! deduplicates them by module id, and biases what gets warmed toward the
//! routes visited most often in a short navigation window.

pub mod error;
pub mod history;
pub mod loader;
pub mod preloader;
pub mod types;
pub mod yield_point;

pub use error::{PreloadError, Result};
pub use history::InteractionHistory;
pub use loader::{module_loader, LoadFuture, ModuleLoader, RouteTable};
pub use preloader::PredictivePreloader;
pub use types::{PreloadReport, PreloaderConfig, PreloaderStats};
pub use yield_point::{
    detect_yield_point, FixedDelay, ForegroundActivity, ForegroundGuard, IdleWait, YieldPoint,
};
