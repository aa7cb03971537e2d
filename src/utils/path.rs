//! Media discovery on the filesystem

use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::model::MediaAsset;
use crate::error::{ScreenError, ScreenResult};

/// Media path utilities
pub struct PathUtils;

impl PathUtils {
    /// Resolve an input path to the media files to screen.
    ///
    /// A file resolves to itself whatever its extension, so an unsupported
    /// file is still reported. A directory is walked recursively and only
    /// recognised image and video files are kept. Results are sorted by path.
    pub fn discover_media(input: &Path) -> ScreenResult<Vec<MediaAsset>> {
        if !input.exists() {
            return Err(ScreenError::InputNotFound {
                path: input.to_string_lossy().to_string(),
            });
        }

        if input.is_file() {
            return Ok(vec![MediaAsset::new(input)]);
        }

        let mut assets: Vec<MediaAsset> = WalkDir::new(input)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| MediaAsset::new(entry.into_path()))
            .filter(|asset| asset.kind.is_media())
            .collect();

        assets.sort_by(|a, b| a.path.cmp(&b.path));
        debug!("Found {} media files under {}", assets.len(), input.display());
        Ok(assets)
    }

    /// File name for display, falling back to the full path
    pub fn file_label(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::MediaKind;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_missing_path() {
        let err = PathUtils::discover_media(Path::new("/no/such/dir")).unwrap_err();
        assert!(matches!(err, ScreenError::InputNotFound { .. }));
    }

    #[test]
    fn test_single_file_kept_even_if_unsupported() {
        let dir = TempDir::new().unwrap();
        let notes = dir.path().join("notes.txt");
        touch(&notes);

        let assets = PathUtils::discover_media(&notes).unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].kind, MediaKind::Unsupported);
    }

    #[test]
    fn test_directory_walk_is_recursive_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("b.mp4"));
        touch(&dir.path().join("a.JPG"));
        touch(&dir.path().join("readme.md"));
        touch(&dir.path().join("nested/c.mov"));
        touch(&dir.path().join("nested/deeper/d.png"));

        let assets = PathUtils::discover_media(dir.path()).unwrap();
        let names: Vec<String> = assets
            .iter()
            .map(|asset| {
                asset
                    .path
                    .strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();

        assert_eq!(names, vec!["a.JPG", "b.mp4", "nested/c.mov", "nested/deeper/d.png"]);
        assert_eq!(assets[0].kind, MediaKind::Image);
        assert_eq!(assets[1].kind, MediaKind::Video);
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(PathUtils::discover_media(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_file_label() {
        assert_eq!(PathUtils::file_label(Path::new("/ads/spot.mp4")), "spot.mp4");
    }
}
