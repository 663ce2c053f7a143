//! Image resolution
//!
//! Components name their images by logical path (`"hamster-cage.png"`). An
//! [`AssetSource`] turns that into an [`Image`] handle when the component is
//! built, so a missing file fails construction instead of a later draw.
//! Decoding pixels is left to whichever [`crate::renderer::Graphics`] backend
//! ends up painting the handle.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ConfigError;

/// Directory within the resources directory that contains the images
pub const IMAGES_DIRECTORY: &str = "images";

/// A resolved image reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    path: String,
}

impl Image {
    /// Full path (or logical name for virtual sources)
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Resolves logical image names
pub trait AssetSource {
    fn image(&self, name: &str) -> Result<Image, ConfigError>;
}

/// Images stored under `<resources>/images`
#[derive(Debug, Clone)]
pub struct ImageDirectory {
    root: PathBuf,
}

impl ImageDirectory {
    /// Use `<resources_dir>/images` as the image root
    pub fn new(resources_dir: &Path) -> Self {
        Self {
            root: resources_dir.join(IMAGES_DIRECTORY),
        }
    }
}

impl AssetSource for ImageDirectory {
    fn image(&self, name: &str) -> Result<Image, ConfigError> {
        let path = self.root.join(name);
        if path.is_file() {
            Ok(Image {
                path: path.to_string_lossy().into_owned(),
            })
        } else {
            log::warn!("Missing image {}", path.display());
            Err(ConfigError::MissingImage(path.to_string_lossy().into_owned()))
        }
    }
}

/// Resolves every name to itself (headless runs and tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct VirtualAssets;

impl AssetSource for VirtualAssets {
    fn image(&self, name: &str) -> Result<Image, ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::MissingImage(String::new()));
        }
        Ok(Image {
            path: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_assets_resolve_names() {
        let image = VirtualAssets.image("ball1.png").unwrap();
        assert_eq!(image.path(), "ball1.png");
        assert!(VirtualAssets.image("").is_err());
    }

    #[test]
    fn test_directory_reports_missing_image() {
        let assets = ImageDirectory::new(Path::new("/nonexistent/resources"));
        let err = assets.image("goal.png").unwrap_err();
        assert!(matches!(err, ConfigError::MissingImage(p) if p.ends_with("goal.png")));
    }

    #[test]
    fn test_directory_finds_existing_image() {
        let dir = std::env::temp_dir().join(format!("contraption-assets-{}", std::process::id()));
        std::fs::create_dir_all(dir.join(IMAGES_DIRECTORY)).unwrap();
        std::fs::write(dir.join(IMAGES_DIRECTORY).join("floor.png"), b"png").unwrap();

        let image = ImageDirectory::new(&dir).image("floor.png");
        let _ = std::fs::remove_dir_all(&dir);
        assert!(image.unwrap().path().ends_with("floor.png"));
    }
}
