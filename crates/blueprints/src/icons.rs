use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use image::imageops::FilterType;
use image::ImageReader;
use thiserror::Error;

pub const DEFAULT_ICON_SIZE_PX: u32 = 64;

/// Decoded RGBA8 icon. Cheap to clone.
#[derive(Clone, PartialEq, Eq)]
pub struct Icon {
    filename: String,
    width: u32,
    height: u32,
    rgba: Arc<Vec<u8>>,
}

impl Icon {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }
}

impl fmt::Debug for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Icon")
            .field("filename", &self.filename)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Error)]
pub enum IconError {
    #[error("invalid icon filename '{filename}': {source}")]
    InvalidName {
        filename: String,
        #[source]
        source: IconPathError,
    },
    #[error("failed to open icon {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode icon {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("no icon source configured for '{filename}'")]
    Unavailable { filename: String },
}

/// Why a filename cannot name a file inside the icons directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IconPathError {
    #[error("names no file")]
    Empty,
    #[error("is absolute")]
    Absolute,
    #[error("steps out of the icons directory")]
    EscapesIconsDir,
    #[error("is not a .png file")]
    NotPng,
}

pub trait IconLoader {
    fn load_icon(&self, filename: &str) -> Result<Icon, IconError>;
}

/// Reads PNG icons from one directory and scales them to a fixed size.
#[derive(Debug, Clone)]
pub struct FileIconLoader {
    icons_dir: PathBuf,
    width: u32,
    height: u32,
}

impl FileIconLoader {
    pub fn new(icons_dir: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            icons_dir: icons_dir.into(),
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn icons_dir(&self) -> &Path {
        &self.icons_dir
    }

    /// Path of `filename` inside the icons directory.
    ///
    /// Only plain relative segments are accepted, so the result can never
    /// leave `icons_dir`.
    pub fn icon_path(&self, filename: &str) -> Result<PathBuf, IconPathError> {
        let mut relative = PathBuf::new();
        for component in Path::new(filename).components() {
            match component {
                Component::Normal(segment) => relative.push(segment),
                Component::CurDir => {}
                Component::ParentDir => return Err(IconPathError::EscapesIconsDir),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(IconPathError::Absolute)
                }
            }
        }
        if relative.as_os_str().is_empty() {
            return Err(IconPathError::Empty);
        }
        let is_png = relative
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("png"));
        if !is_png {
            return Err(IconPathError::NotPng);
        }
        Ok(self.icons_dir.join(relative))
    }
}

impl IconLoader for FileIconLoader {
    fn load_icon(&self, filename: &str) -> Result<Icon, IconError> {
        let path = self.icon_path(filename).map_err(|source| IconError::InvalidName {
            filename: filename.to_string(),
            source,
        })?;
        let reader = ImageReader::open(&path).map_err(|source| IconError::Io {
            path: path.clone(),
            source,
        })?;
        let decoded = reader.decode().map_err(|source| IconError::Decode {
            path: path.clone(),
            source,
        })?;
        let mut image = decoded.to_rgba8();
        if image.width() != self.width || image.height() != self.height {
            image = image::imageops::resize(&image, self.width, self.height, FilterType::Triangle);
        }
        Ok(Icon {
            filename: filename.to_string(),
            width: image.width(),
            height: image.height(),
            rgba: Arc::new(image.into_raw()),
        })
    }
}

/// Loader for runs without an icons directory; every lookup fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIcons;

impl IconLoader for NoIcons {
    fn load_icon(&self, filename: &str) -> Result<Icon, IconError> {
        Err(IconError::Unavailable {
            filename: filename.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    use super::*;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
        let image = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]));
        image.save(dir.join(name)).expect("save png");
    }

    #[test]
    fn loads_and_scales_png() {
        let temp = TempDir::new().expect("temp");
        write_png(temp.path(), "Toughness.png", 32, 16);

        let loader = FileIconLoader::new(temp.path(), DEFAULT_ICON_SIZE_PX, DEFAULT_ICON_SIZE_PX);
        let icon = loader.load_icon("Toughness.png").expect("icon");
        assert_eq!(icon.filename(), "Toughness.png");
        assert_eq!((icon.width(), icon.height()), (64, 64));
        assert_eq!(icon.rgba().len(), 64 * 64 * 4);
    }

    #[test]
    fn missing_file_is_io_error() {
        let temp = TempDir::new().expect("temp");
        let loader = FileIconLoader::new(temp.path(), 64, 64);
        let error = loader.load_icon("Missing.png").expect_err("missing");
        assert!(matches!(error, IconError::Io { .. }));
    }

    #[test]
    fn garbage_file_is_decode_error() {
        let temp = TempDir::new().expect("temp");
        fs::write(temp.path().join("Broken.png"), b"not a png").expect("write");
        let loader = FileIconLoader::new(temp.path(), 64, 64);
        let error = loader.load_icon("Broken.png").expect_err("broken");
        assert!(matches!(error, IconError::Decode { .. }));
    }

    #[test]
    fn traversal_is_rejected_before_touching_disk() {
        let temp = TempDir::new().expect("temp");
        let loader = FileIconLoader::new(temp.path(), 64, 64);
        let error = loader.load_icon("../secret.png").expect_err("invalid");
        assert!(matches!(
            error,
            IconError::InvalidName {
                source: IconPathError::EscapesIconsDir,
                ..
            }
        ));
    }

    #[test]
    fn icon_path_stays_inside_icons_dir() {
        let loader = FileIconLoader::new("/mods/kineticist/Icons", 64, 64);
        assert_eq!(
            loader.icon_path("feats/./IronWill.PNG").expect("nested"),
            PathBuf::from("/mods/kineticist/Icons/feats/IronWill.PNG")
        );
        assert_eq!(
            loader.icon_path("Kinetic Blade.png").expect("spaces"),
            PathBuf::from("/mods/kineticist/Icons/Kinetic Blade.png")
        );

        let rejected = [
            ("", IconPathError::Empty),
            ("./", IconPathError::Empty),
            ("/etc/Toughness.png", IconPathError::Absolute),
            ("feats/../../Toughness.png", IconPathError::EscapesIconsDir),
            ("Toughness.jpg", IconPathError::NotPng),
            ("Toughness", IconPathError::NotPng),
        ];
        for (filename, expected) in rejected {
            assert_eq!(loader.icon_path(filename), Err(expected), "filename={filename}");
        }
    }
}
