//! Presentation surface contract.
//!
//! The surface renders acquisition progress and results. It only receives
//! events; commands flow the other way through the orchestrator.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// An image ready to be shown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplayImage {
    /// Where the image bytes live.
    pub path: PathBuf,
    pub title: String,
    pub author: String,
    pub size_bytes: u64,
}

/// Events delivered to the presentation surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum SurfaceEvent {
    Loading(bool),
    ImageReady(DisplayImage),
    SettingWallpaper(bool),
    WallpaperSet(bool),
    Error(String),
}

/// Receives [`SurfaceEvent`]s. Implementations must not block.
pub trait PresentationSurface: Send + Sync {
    fn notify(&self, event: SurfaceEvent);
}

/// Surface that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl PresentationSurface for NullSurface {
    fn notify(&self, _event: SurfaceEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_string(&SurfaceEvent::Loading(true)).unwrap();
        assert_eq!(json, r#"{"event":"loading","data":true}"#);

        let json = serde_json::to_string(&SurfaceEvent::Error("boom".to_string())).unwrap();
        assert_eq!(json, r#"{"event":"error","data":"boom"}"#);
    }

    #[test]
    fn test_image_ready_round_trip() {
        let event = SurfaceEvent::ImageReady(DisplayImage {
            path: PathBuf::from("/tmp/current-wallpaper.jpg"),
            title: "Irises".to_string(),
            author: "Vincent van Gogh".to_string(),
            size_bytes: 1024,
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.starts_with(r#"{"event":"image-ready""#));
        let parsed: SurfaceEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
