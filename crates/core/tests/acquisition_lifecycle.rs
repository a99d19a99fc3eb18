//! Acquisition lifecycle integration tests.
//!
//! These tests drive the orchestrator through a session and a restart:
//! choose source -> refresh -> set wallpaper -> restart -> restore + show

use std::sync::Arc;

use tempfile::TempDir;

use easel_core::{
    testing::{
        fixtures, MockBackgroundSetter, MockFlatCatalog, MockPagedCatalog, MockTransport,
        RecordingSurface, ScriptedRandomness,
    },
    AcquisitionConfig, AcquisitionOrchestrator, AcquisitionState, CandidateSelector,
    CatalogCache, CatalogSource, FsImageStore, JsonSettingsStore, SelectionConfig,
    SourceDescriptor, SourceRegistry, SurfaceEvent,
};

/// Test helper that owns the mocks and the storage directory, so several
/// orchestrators can be built over the same persisted state.
struct TestHarness {
    flat: Arc<MockFlatCatalog>,
    paged: Arc<MockPagedCatalog>,
    transport: MockTransport,
    temp_dir: TempDir,
}

impl TestHarness {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let transport = MockTransport::new();

        let flat = Arc::new(MockFlatCatalog::new());
        flat.set_identifiers(&["436528", "436532"]).await;
        flat.add_artwork(
            "436532",
            fixtures::artwork(
                "https://images.test/met/436532.jpg",
                "Self-Portrait with a Straw Hat",
                "Vincent van Gogh",
            ),
        )
        .await;
        transport
            .add_image("https://images.test/met/436532.jpg", fixtures::jpeg_bytes("met"))
            .await;

        let paged = Arc::new(MockPagedCatalog::with_image_base("https://images.test/artic"));
        paged
            .set_page(
                3,
                vec![
                    fixtures::candidate("1", Some("public"), true),
                    fixtures::candidate("2", Some("restricted"), false),
                ],
            )
            .await;
        transport
            .add_image(&paged.image_url("public"), fixtures::jpeg_bytes("artic"))
            .await;

        Self {
            flat,
            paged,
            transport,
            temp_dir,
        }
    }

    fn create_orchestrator(&self, surface: &RecordingSurface) -> AcquisitionOrchestrator {
        let registry = SourceRegistry::new();
        registry.register(
            SourceDescriptor::new("met", "Metropolitan Museum of Art"),
            CatalogSource::Flat(self.flat.clone()),
        );
        registry.register(
            SourceDescriptor::new("artic", "Art Institute of Chicago"),
            CatalogSource::Paged(self.paged.clone()),
        );

        let selector = CandidateSelector::new(
            SelectionConfig::default(),
            Arc::new(CatalogCache::default()),
            Arc::new(self.transport.clone()),
        )
        .with_randomness(ScriptedRandomness::new().with_indices(&[0, 1]).with_pages(&[3]));

        AcquisitionOrchestrator::new(
            AcquisitionConfig {
                keep_archives: 2,
                ..Default::default()
            },
            Arc::new(registry),
            selector,
            Arc::new(self.transport.clone()),
            FsImageStore::new(self.temp_dir.path()),
            Arc::new(JsonSettingsStore::in_dir(self.temp_dir.path())),
            Arc::new(surface.clone()),
        )
    }
}

#[tokio::test]
async fn test_session_then_restart() {
    let harness = TestHarness::new().await;

    // First session: switch to the paged source, fetch, promote three times.
    let surface = RecordingSurface::new();
    let orchestrator = harness.create_orchestrator(&surface);
    assert_eq!(orchestrator.state(), AcquisitionState::Idle);

    orchestrator.select_source("artic").await.unwrap();
    let stored = orchestrator.refresh().await.unwrap();
    assert_eq!(stored.title, "Artwork 1");
    assert_eq!(orchestrator.state(), AcquisitionState::Succeeded);

    let setter = MockBackgroundSetter::new();
    for _ in 0..3 {
        orchestrator.set_wallpaper(&setter).await.unwrap();
    }
    assert_eq!(setter.applied().await.len(), 3);
    assert_eq!(orchestrator.store().list_archives().await.unwrap().len(), 2);
    assert!(surface.errors().is_empty());

    // Second session: the saved source and image come back without a fetch.
    let downloads_before = harness.transport.downloads().await.len();
    let surface = RecordingSurface::new();
    let orchestrator = harness.create_orchestrator(&surface);

    assert_eq!(orchestrator.registry().active_id().as_deref(), Some("met"));
    assert_eq!(orchestrator.restore_source().await.as_deref(), Some("artic"));

    let shown = orchestrator.load_initial().await.unwrap();
    assert_eq!(shown, stored);
    assert_eq!(harness.transport.downloads().await.len(), downloads_before);
    assert!(matches!(surface.events().as_slice(), [SurfaceEvent::ImageReady(_)]));
}

#[tokio::test]
async fn test_flat_source_skips_objects_without_image() {
    let harness = TestHarness::new().await;
    let surface = RecordingSurface::new();
    let orchestrator = harness.create_orchestrator(&surface);

    let stored = orchestrator.refresh().await.unwrap();
    assert_eq!(stored.author, "Vincent van Gogh");
    assert_eq!(harness.flat.resolve_calls().await, vec!["436528", "436532"]);
    assert_eq!(harness.flat.listing_calls().await, 1);
    assert!(harness.paged.pages_listed().await.is_empty());
}

#[tokio::test]
async fn test_source_switch_changes_catalog() {
    let harness = TestHarness::new().await;
    let surface = RecordingSurface::new();
    let orchestrator = harness.create_orchestrator(&surface);

    let first = orchestrator.acquire_one().await.unwrap();
    orchestrator.select_source("artic").await.unwrap();
    let second = orchestrator.acquire_one().await.unwrap();

    assert_ne!(first.title, second.title);
    assert_eq!(harness.paged.pages_listed().await, vec![3]);

    let metadata = orchestrator.store().read_metadata().await;
    assert_eq!(metadata.source_id.as_deref(), Some("artic"));
}
