//! Terminal presentation surface.

use easel_core::{PresentationSurface, SurfaceEvent};

use crate::output::format_image;

/// Prints progress and results to stdout.
///
/// Error events are not printed; the failing command's error is reported
/// once when the process exits.
#[derive(Debug, Default)]
pub struct TerminalSurface;

/// Text shown for an event, if any.
pub fn render(event: &SurfaceEvent) -> Option<String> {
    match event {
        SurfaceEvent::Loading(true) => Some("Fetching a random artwork...".to_string()),
        SurfaceEvent::ImageReady(image) => Some(format_image(image)),
        SurfaceEvent::SettingWallpaper(true) => Some("Setting wallpaper...".to_string()),
        SurfaceEvent::WallpaperSet(true) => Some("Wallpaper set.".to_string()),
        SurfaceEvent::Loading(false)
        | SurfaceEvent::SettingWallpaper(false)
        | SurfaceEvent::WallpaperSet(false)
        | SurfaceEvent::Error(_) => None,
    }
}

impl PresentationSurface for TerminalSurface {
    fn notify(&self, event: SurfaceEvent) {
        if let Some(line) = render(&event) {
            println!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_progress() {
        assert_eq!(
            render(&SurfaceEvent::Loading(true)).as_deref(),
            Some("Fetching a random artwork...")
        );
        assert!(render(&SurfaceEvent::Loading(false)).is_none());
        assert!(render(&SurfaceEvent::Error("boom".to_string())).is_none());
    }
}
