//! CLI output formatting.

use easel_core::{DisplayImage, SourceDescriptor};

pub fn debug_enabled() -> bool {
    std::env::var_os("EASEL_DEBUG").is_some_and(|v| !v.is_empty())
}

pub fn print_error(err: &anyhow::Error) {
    if debug_enabled() {
        eprintln!("{err:#}");
    } else {
        eprintln!("error: {err}");
    }
}

/// One line per source, the active one marked with `*`.
pub fn format_sources(sources: &[SourceDescriptor], active: Option<&str>) -> String {
    sources
        .iter()
        .map(|s| {
            let marker = if Some(s.id.as_str()) == active { '*' } else { ' ' };
            format!("{marker} {:<8} {}", s.id, s.display_name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_image(image: &DisplayImage) -> String {
    format!(
        "\"{}\" by {}\n  {} ({} KiB)",
        image.title,
        image.author,
        image.path.display(),
        image.size_bytes.div_ceil(1024)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn marks_active_source() {
        let sources = vec![
            SourceDescriptor::new("met", "Metropolitan Museum of Art"),
            SourceDescriptor::new("artic", "Art Institute of Chicago"),
        ];
        let out = format_sources(&sources, Some("artic"));
        assert_eq!(
            out,
            "  met      Metropolitan Museum of Art\n* artic    Art Institute of Chicago"
        );
    }

    #[test]
    fn formats_image() {
        let image = DisplayImage {
            path: PathBuf::from("/home/u/.fineartwallpaper/current-wallpaper.jpg"),
            title: "Irises".to_string(),
            author: "Vincent van Gogh".to_string(),
            size_bytes: 2048,
        };
        assert_eq!(
            format_image(&image),
            "\"Irises\" by Vincent van Gogh\n  /home/u/.fineartwallpaper/current-wallpaper.jpg (2 KiB)"
        );
    }
}
