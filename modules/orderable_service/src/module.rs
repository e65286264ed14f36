//! Module declaration and lifecycle

use crate::api::native::NativeClient;
use crate::config::Config;
use crate::contract::ContentOrderingApi;
use crate::domain::{
    ContentCatalog, ContentRepository, ContentService, EventPublisher, NoOpEventPublisher,
};
use crate::infra::storage::SeaOrmContentStore;
use anyhow::Result;
use parking_lot::RwLock;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Orderable service module: owns the wired services and their client
pub struct OrderableServiceModule {
    config: Config,
    wired: RwLock<Option<Wired>>,
}

#[derive(Clone)]
struct Wired {
    service: Arc<ContentService>,
    catalog: Arc<ContentCatalog>,
}

impl Default for OrderableServiceModule {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl OrderableServiceModule {
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            wired: RwLock::new(None),
        }
    }

    /// Run database migrations
    pub async fn migrate(&self, db: &DatabaseConnection) -> Result<()> {
        use crate::infra::storage::migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        Migrator::up(db, None).await?;
        tracing::info!("Orderable service migrations completed");
        Ok(())
    }

    /// Wire the service over the SeaORM content store
    pub fn init(&self, db: Arc<DatabaseConnection>) -> Result<()> {
        let store = Arc::new(SeaOrmContentStore::new(db));
        self.init_with_store(store, Arc::new(NoOpEventPublisher))
    }

    /// Wire the services over any content store
    pub fn init_with_store<S>(
        &self,
        store: Arc<S>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Result<()>
    where
        S: ContentRepository + 'static,
    {
        let service = Arc::new(ContentService::new(
            store.clone(),
            event_publisher,
            self.config.clone(),
        ));
        let catalog = Arc::new(ContentCatalog::new(store, self.config.clone()));
        *self.wired.write() = Some(Wired { service, catalog });

        tracing::info!("Orderable service initialized");
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn wired(&self) -> Result<Wired> {
        self.wired
            .read()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    pub fn service(&self) -> Result<Arc<ContentService>> {
        Ok(self.wired()?.service)
    }

    pub fn catalog(&self) -> Result<Arc<ContentCatalog>> {
        Ok(self.wired()?.catalog)
    }

    /// In-process client for controllers and other modules
    pub fn client(&self) -> Result<Arc<dyn ContentOrderingApi>> {
        let wired = self.wired()?;
        Ok(Arc::new(NativeClient::new(wired.service, wired.catalog)))
    }

    /// Register REST routes on `router`
    pub fn register_rest(&self, router: axum::Router) -> Result<axum::Router> {
        tracing::info!("Registering orderable service REST routes");
        crate::api::rest::routes::register_routes(router, self.client()?)
    }

    /// Serve the REST routes until `cancel` fires
    pub async fn serve(self: Arc<Self>, listener: TcpListener, cancel: CancellationToken) -> Result<()> {
        let router = self.register_rest(axum::Router::new())?;
        tracing::info!(addr = ?listener.local_addr().ok(), "Orderable service listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(async move { cancel.cancelled().await })
            .await?;

        tracing::info!("Orderable service stopped");
        Ok(())
    }
}
