use crate::config::{AppConfig, StoreBackendKind};
use crate::models::User;
use docrest::backend::StoreBackendBuilder;
use docrest::memory::InMemoryStore;
use docrest::mongodb::MongoDbStore;
use docrest::service::CrudService;
use docrest::store::DocumentStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Store handle shared by every service
    pub store: DocumentStore,

    /// CRUD operations over the `users` collection
    pub users: CrudService<User>,
}

impl AppState {
    /// Create new application state over an already connected store
    pub fn new(config: AppConfig, store: DocumentStore) -> Self {
        Self {
            config: Arc::new(config),
            users: CrudService::new(store.clone()),
            store,
        }
    }
}

/// Build the store backend selected by the configuration.
///
/// The MongoDB client connects lazily, so an unreachable server surfaces on the
/// first request (or readiness probe) rather than here.
pub async fn connect_store(config: &AppConfig) -> anyhow::Result<DocumentStore> {
    let store = match config.store_backend {
        StoreBackendKind::Mongodb => DocumentStore::new(
            MongoDbStore::builder(&config.mongodb_url, &config.database_name)
                .server_selection_timeout(config.server_selection_timeout())
                .app_name(config.app_name.clone())
                .build()
                .await?,
        ),
        StoreBackendKind::Memory => {
            tracing::warn!("Using in-memory store, data will not survive a restart");
            DocumentStore::new(InMemoryStore::builder().build().await?)
        }
    };

    Ok(store)
}
