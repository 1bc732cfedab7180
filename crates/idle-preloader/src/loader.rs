//! Module loaders and the route lookup table

use crate::error::Result;
use futures::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Future returned by a module loader
pub type LoadFuture = BoxFuture<'static, Result<()>>;

/// Zero-argument module fetch primitive, opaque to the preloader
pub type ModuleLoader = Arc<dyn Fn() -> LoadFuture + Send + Sync>;

/// Wrap an async closure as a [`ModuleLoader`]
pub fn module_loader<F, Fut>(f: F) -> ModuleLoader
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move || f().boxed())
}

/// Maps route identifiers to the loader that warms them
#[derive(Clone, Default)]
pub struct RouteTable {
    loaders: HashMap<String, ModuleLoader>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, route: impl Into<String>, loader: ModuleLoader) {
        self.loaders.insert(route.into(), loader);
    }

    pub fn with_route(mut self, route: impl Into<String>, loader: ModuleLoader) -> Self {
        self.insert(route, loader);
        self
    }

    pub fn get(&self, route: &str) -> Option<&ModuleLoader> {
        self.loaders.get(route)
    }

    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.loaders.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut routes: Vec<_> = self.routes().collect();
        routes.sort_unstable();
        f.debug_struct("RouteTable").field("routes", &routes).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PreloadError;

    #[tokio::test]
    async fn test_module_loader_runs_closure() {
        let ok = module_loader(|| async { Ok(()) });
        assert!(ok().await.is_ok());

        let failing = module_loader(|| async { Err(PreloadError::from("boom")) });
        assert!(failing().await.is_err());
    }

    #[test]
    fn test_route_table_lookup() {
        let table = RouteTable::new()
            .with_route("patients", module_loader(|| async { Ok(()) }))
            .with_route("documents", module_loader(|| async { Ok(()) }));

        assert_eq!(table.len(), 2);
        assert!(table.get("patients").is_some());
        assert!(table.get("billing").is_none());
        assert!(format!("{:?}", table).contains("documents"));
    }

    #[test]
    fn test_empty_route_table() {
        let table = RouteTable::default();
        assert!(table.is_empty());
        assert_eq!(table.routes().count(), 0);
    }
}
