pub mod handlers;
pub mod models;
pub mod routes;


use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use shelf_db::SharedStore;
use shelf_kernel::{InitCtx, Module};

/// The books API over the shared store handle
pub struct BooksModule {
    store: SharedStore,
}

impl BooksModule {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    /// Ping the deployment. An unreachable database is logged, not fatal:
    /// requests fail individually until it comes back.
    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        match self.store.ping().await {
            Ok(()) => tracing::info!(
                module = self.name(),
                database = %ctx.settings.database.name,
                "pinged deployment, database connection is live"
            ),
            Err(err) => tracing::warn!(
                module = self.name(),
                error = %err,
                "database ping failed; serving anyway"
            ),
        }
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(Arc::clone(&self.store))
    }

    // Clients call the routes unprefixed.
    fn mount_path(&self) -> String {
        "/".to_string()
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.store.close().await;
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(store: SharedStore) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
