use crate::colour::{colours, Colour};
use crate::BillboardError;
use image::{DynamicImage, RgbImage};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Size of the canvas painted when no background image is available
pub const FALLBACK_SIZE: (u32, u32) = (800, 533);

/// Somewhere a billboard background can be loaded from
pub trait BackgroundSource: Send + Sync {
    fn load(&self) -> Result<DynamicImage, BillboardError>;

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

/// A background image read from disk. The format is guessed from the file contents
#[derive(Debug, Clone)]
pub struct FileBackground {
    pub path: PathBuf,
}

impl FileBackground {
    pub fn new<P: AsRef<Path>>(path: P) -> FileBackground {
        FileBackground {
            path: path.as_ref().to_owned(),
        }
    }
}

impl BackgroundSource for FileBackground {
    fn load(&self) -> Result<DynamicImage, BillboardError> {
        let data = std::fs::read(&self.path)?;
        let format = image::guess_format(&data)?;
        Ok(image::load_from_memory_with_format(&data, format)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A background image held in memory, either encoded or already decoded
#[derive(Debug, Clone)]
pub enum MemoryBackground {
    Encoded(Vec<u8>),
    Decoded(DynamicImage),
}

impl BackgroundSource for MemoryBackground {
    fn load(&self) -> Result<DynamicImage, BillboardError> {
        match self {
            MemoryBackground::Encoded(bytes) => Ok(image::load_from_memory(bytes)?),
            MemoryBackground::Decoded(image) => Ok(image.clone()),
        }
    }

    fn describe(&self) -> String {
        match self {
            MemoryBackground::Encoded(bytes) => format!("{} encoded bytes", bytes.len()),
            MemoryBackground::Decoded(image) => {
                format!("{}x{} decoded image", image.width(), image.height())
            }
        }
    }
}

/// Solid canvas used in place of a background that failed to load
pub fn fallback_canvas() -> RgbImage {
    solid_canvas(FALLBACK_SIZE.0, FALLBACK_SIZE.1, colours::BILLBOARD_BLUE)
}

pub fn solid_canvas(width: u32, height: u32, colour: Colour) -> RgbImage {
    RgbImage::from_pixel(width, height, colour.into())
}

/// Loads a background once and hands out private copies of it.
///
/// The first call to [BackgroundCache::canvas] loads the source; concurrent
/// first callers wait for that single load. If loading fails the cache holds
/// [fallback_canvas] instead, so callers always get something to draw on. The
/// cached image is never mutated: every call returns a fresh clone that the
/// caller is free to draw over.
pub struct BackgroundCache {
    source: Box<dyn BackgroundSource>,
    image: OnceLock<RgbImage>,
}

impl BackgroundCache {
    pub fn new<S: BackgroundSource + 'static>(source: S) -> BackgroundCache {
        BackgroundCache {
            source: Box::new(source),
            image: OnceLock::new(),
        }
    }

    fn cached(&self) -> &RgbImage {
        self.image.get_or_init(|| match self.source.load() {
            Ok(image) => {
                let image = image.to_rgb8();
                tracing::debug!(
                    source = %self.source.describe(),
                    width = image.width(),
                    height = image.height(),
                    "loaded billboard background"
                );
                image
            }
            Err(error) => {
                tracing::warn!(
                    source = %self.source.describe(),
                    %error,
                    "could not load billboard background, using fallback"
                );
                fallback_canvas()
            }
        })
    }

    /// A private, mutable copy of the background
    pub fn canvas(&self) -> RgbImage {
        self.cached().clone()
    }

    /// Dimensions of the background, loading it if needed
    pub fn dimensions(&self) -> (u32, u32) {
        self.cached().dimensions()
    }

    pub fn is_loaded(&self) -> bool {
        self.image.get().is_some()
    }
}

impl std::fmt::Debug for BackgroundCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundCache")
            .field("source", &self.source.describe())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
