//! Backend registry and process-wide client lifecycle.
//!
//! `StorageRegistry` resolves the configured backend kind to exactly one
//! shared provider instance. Construction uses double-checked acquisition:
//! a lock-free read of the slot, then an init mutex, then a re-check, so
//! concurrent first callers block instead of racing duplicate backends.
//! A failed construction leaves the slot empty -- the next access retries.

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use colloquy_core::storage::box_provider::BoxStorageProvider;
use colloquy_infra::memory::store::MemoryStore;
use colloquy_types::config::{StorageConfig, StorageKind};
use colloquy_types::error::StorageError;

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// Defensive bound on backend construction; a hung connection attempt must
/// not wedge every caller queued on the init lock.
const INIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Future returned by a provider factory.
pub type ProviderFuture =
    Pin<Box<dyn Future<Output = Result<BoxStorageProvider, StorageError>> + Send>>;

/// Constructs and initializes a provider for one backend kind.
///
/// The factory owns the whole initialization (opening connections, journal
/// recovery); the registry awaits it inside the init critical section.
pub type ProviderFactory = Box<dyn Fn(StorageConfig) -> ProviderFuture + Send + Sync>;

/// Resolves configuration to one shared, lazily constructed provider.
pub struct StorageRegistry {
    config: RwLock<StorageConfig>,
    factories: DashMap<StorageKind, ProviderFactory>,
    slot: RwLock<Option<Arc<BoxStorageProvider>>>,
    init_lock: Mutex<()>,
}

impl StorageRegistry {
    /// Registry with the reference backend pre-registered.
    pub fn new(config: StorageConfig) -> Self {
        let registry = Self {
            config: RwLock::new(config),
            factories: DashMap::new(),
            slot: RwLock::new(None),
            init_lock: Mutex::new(()),
        };
        registry.register_factory(StorageKind::Reference, |config| {
            Box::pin(async move {
                let store = MemoryStore::open(&config).await;
                Ok(BoxStorageProvider::new(store))
            })
        });
        registry
    }

    /// Register (or replace) the factory for a backend kind.
    ///
    /// External vector/graph/relational adapters hook in here.
    pub fn register_factory<F>(&self, kind: StorageKind, factory: F)
    where
        F: Fn(StorageConfig) -> ProviderFuture + Send + Sync + 'static,
    {
        self.factories.insert(kind, Box::new(factory));
    }

    /// Replace the active configuration and drop any constructed provider;
    /// the next `client` call builds against the new configuration.
    pub async fn configure(&self, config: StorageConfig) {
        *self.config.write().await = config;
        *self.slot.write().await = None;
    }

    /// Drop the constructed provider (shutdown/test lifecycle). The next
    /// `client` call reconstructs it.
    pub async fn reset(&self) {
        *self.slot.write().await = None;
    }

    /// Get or build the shared provider instance.
    ///
    /// All concurrent callers observe the same instance; initialization runs
    /// exactly once per successful construction. Errors are never cached.
    pub async fn client(&self) -> Result<Arc<BoxStorageProvider>, StorageError> {
        if let Some(provider) = self.slot.read().await.as_ref() {
            return Ok(Arc::clone(provider));
        }

        let _guard = self.init_lock.lock().await;
        // Re-check: another caller may have finished construction while we
        // waited on the init lock.
        if let Some(provider) = self.slot.read().await.as_ref() {
            return Ok(Arc::clone(provider));
        }

        let config = self.config.read().await.clone();
        let kind = resolve_kind(&config)?;
        info!(kind = %kind, "initializing storage client");

        let future = {
            let factory = self.factories.get(&kind).ok_or_else(|| {
                StorageError::Initialization(format!(
                    "no provider factory registered for backend '{kind}'"
                ))
            })?;
            // Create the future while the map guard is held, await after.
            (factory.value())(config)
        };
        let provider = match tokio::time::timeout(INIT_TIMEOUT, future).await {
            Ok(result) => Arc::new(result?),
            Err(_) => {
                return Err(StorageError::Initialization(format!(
                    "backend '{kind}' initialization timed out after {INIT_TIMEOUT:?}"
                )));
            }
        };

        *self.slot.write().await = Some(Arc::clone(&provider));
        info!(kind = %kind, "storage client initialized");
        Ok(provider)
    }
}

/// Resolve the configured kind string, falling back (with a warning) on an
/// unrecognized value unless strict resolution is enabled.
fn resolve_kind(config: &StorageConfig) -> Result<StorageKind, StorageError> {
    match config.storage_kind.parse::<StorageKind>() {
        Ok(kind) => Ok(kind),
        Err(_) if config.strict_kind => Err(StorageError::Configuration(format!(
            "unknown storage kind '{}'",
            config.storage_kind
        ))),
        Err(_) => {
            warn!(
                requested = %config.storage_kind,
                fallback = %config.fallback_kind,
                "unknown storage kind, falling back"
            );
            Ok(config.fallback_kind)
        }
    }
}

static REGISTRY: OnceLock<StorageRegistry> = OnceLock::new();

/// The process-wide registry backing the facade functions.
///
/// Starts with `StorageConfig::default()`; call
/// [`StorageRegistry::configure`] on it during startup to change backends.
pub fn global() -> &'static StorageRegistry {
    REGISTRY.get_or_init(|| StorageRegistry::new(StorageConfig::default()))
}
