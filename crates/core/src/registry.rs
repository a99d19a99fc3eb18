//! Registry of catalog sources and the active selection.

use std::sync::{PoisonError, RwLock};

use thiserror::Error;
use tracing::info;

use crate::catalog::{ArticClient, CatalogError, CatalogSource, MetClient, SourceDescriptor};
use crate::config::Config;

/// Errors from the source registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No source with this id is registered.
    #[error("Unknown source: {0}")]
    UnknownSource(String),

    /// The registry holds no sources.
    #[error("No catalog sources registered")]
    Empty,

    /// A built-in client could not be constructed.
    #[error("Failed to build catalog client: {0}")]
    Client(#[from] CatalogError),
}

struct RegisteredSource {
    descriptor: SourceDescriptor,
    source: CatalogSource,
}

struct RegistryState {
    sources: Vec<RegisteredSource>,
    active: Option<String>,
}

/// Holds every catalog source in registration order plus the active id.
///
/// The first registered source becomes active until [`set_active`] picks
/// another.
///
/// [`set_active`]: SourceRegistry::set_active
pub struct SourceRegistry {
    state: RwLock<RegistryState>,
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState {
                sources: Vec::new(),
                active: None,
            }),
        }
    }

    /// Registry with the Met and ARTIC clients built from `config`, with
    /// `sources.default_source` active.
    pub fn with_default_sources(config: &Config) -> Result<Self, RegistryError> {
        let registry = Self::new();
        registry.register(
            MetClient::descriptor(),
            CatalogSource::flat(MetClient::new(config.sources.met.clone(), &config.transport)?),
        );
        registry.register(
            ArticClient::descriptor(),
            CatalogSource::paged(ArticClient::new(
                config.sources.artic.clone(),
                &config.transport,
            )?),
        );
        registry.set_active(&config.sources.default_source)?;
        Ok(registry)
    }

    /// Register a source. Re-registering an id replaces its client in place.
    ///
    /// Returns `true` when an existing client was replaced. Identifiers cached
    /// for that id came from the old client, so callers holding a cache should
    /// go through `AcquisitionOrchestrator::register_source`.
    pub fn register(&self, descriptor: SourceDescriptor, source: CatalogSource) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = state
            .sources
            .iter_mut()
            .find(|s| s.descriptor.id == descriptor.id)
        {
            info!("Replaced catalog source {}", descriptor.id);
            existing.descriptor = descriptor;
            existing.source = source;
            return true;
        }

        if state.active.is_none() {
            state.active = Some(descriptor.id.clone());
        }
        state.sources.push(RegisteredSource { descriptor, source });
        false
    }

    /// Make `id` the active source. An unknown id leaves the active source
    /// unchanged.
    pub fn set_active(&self, id: &str) -> Result<(), RegistryError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        if !state.sources.iter().any(|s| s.descriptor.id == id) {
            return Err(RegistryError::UnknownSource(id.to_string()));
        }

        if state.active.as_deref() != Some(id) {
            info!("Active catalog source set to {}", id);
        }
        state.active = Some(id.to_string());
        Ok(())
    }

    /// Id of the active source.
    pub fn active_id(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .active
            .clone()
    }

    /// Descriptor and client of the active source.
    pub fn active(&self) -> Result<(SourceDescriptor, CatalogSource), RegistryError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let active = state.active.as_deref().ok_or(RegistryError::Empty)?;

        state
            .sources
            .iter()
            .find(|s| s.descriptor.id == active)
            .map(|s| (s.descriptor.clone(), s.source.clone()))
            .ok_or_else(|| RegistryError::UnknownSource(active.to_string()))
    }

    /// Every registered source, in registration order.
    pub fn list_all(&self) -> Vec<SourceDescriptor> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .sources
            .iter()
            .map(|s| s.descriptor.clone())
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .sources
            .iter()
            .any(|s| s.descriptor.id == id)
    }
}
