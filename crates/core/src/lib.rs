pub mod acquisition;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod registry;
pub mod selector;
pub mod storage;
pub mod surface;
pub mod testing;
pub mod transport;
pub mod wallpaper;

pub use acquisition::{
    AcquisitionConfig, AcquisitionError, AcquisitionOrchestrator, AcquisitionState,
};
pub use cache::{CatalogCache, CatalogCacheEntry, DEFAULT_CACHE_TTL};
pub use catalog::{
    ArticClient, ArticConfig, ArtworkCandidate, CatalogError, CatalogSource, FlatCatalog,
    MetClient, MetConfig, PagedCatalog, ResolvedArtwork, SourceDescriptor,
};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, SourcesConfig,
};
pub use registry::{RegistryError, SourceRegistry};
pub use selector::{CandidateSelector, Randomness, SelectionConfig, SelectionError, StdRandomness};
pub use storage::{
    FsImageStore, ImageMetadata, JsonSettingsStore, Settings, SettingsError, SettingsStore,
    StorageConfig, StorageError, StoredImage,
};
pub use surface::{DisplayImage, NullSurface, PresentationSurface, SurfaceEvent};
pub use transport::{HttpTransport, ImageTransport, TransportConfig, TransportError};
pub use wallpaper::{BackgroundSetter, WallpaperError};
