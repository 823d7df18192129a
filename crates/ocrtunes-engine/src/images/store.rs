use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ::image::{ImageError, Rgba, RgbaImage};

use crate::coords::Vec2;

const PLACEHOLDER_SIZE: u32 = 64;
const PLACEHOLDER_CELL: u32 = 8;

/// Handle to an image held by an [`ImageStore`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ImageId(pub(crate) usize);

/// Owns decoded RGBA8 images (straight alpha).
///
/// Images never change once stored, so renderers may cache them by id.
///
/// Slot 0 always holds the default placeholder; every lookup of an unknown id
/// and every failed load resolves to it, so drawing never fails on a missing
/// asset.
pub struct ImageStore {
    images: Vec<RgbaImage>,
    by_path: HashMap<PathBuf, ImageId>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self {
            images: vec![checkerboard()],
            by_path: HashMap::new(),
        }
    }

    /// The default image used when an asset is unavailable.
    #[inline]
    pub const fn placeholder() -> ImageId {
        ImageId(0)
    }

    /// Adds an already decoded image.
    pub fn insert(&mut self, image: RgbaImage) -> ImageId {
        let id = ImageId(self.images.len());
        self.images.push(image);
        id
    }

    /// Decodes the file at `path`, caching by path.
    pub fn try_load(&mut self, path: impl AsRef<Path>) -> Result<ImageId, ImageError> {
        let path = path.as_ref();
        if let Some(&id) = self.by_path.get(path) {
            return Ok(id);
        }
        let decoded = ::image::open(path)?.to_rgba8();
        let id = self.insert(decoded);
        self.by_path.insert(path.to_path_buf(), id);
        log::debug!("loaded image {} as {:?}", path.display(), id);
        Ok(id)
    }

    /// Like [`ImageStore::try_load`] but falls back to the placeholder.
    pub fn load(&mut self, path: impl AsRef<Path>) -> ImageId {
        let path = path.as_ref();
        match self.try_load(path) {
            Ok(id) => id,
            Err(e) => {
                log::warn!("image {} unavailable, using placeholder: {e}", path.display());
                // Remember the failure so the file is not re-read every frame.
                self.by_path.insert(path.to_path_buf(), Self::placeholder());
                Self::placeholder()
            }
        }
    }

    /// Returns the image for `id`, or the placeholder for unknown ids.
    pub fn get(&self, id: ImageId) -> &RgbaImage {
        self.images.get(id.0).unwrap_or(&self.images[0])
    }

    /// Natural size in pixels.
    pub fn size(&self, id: ImageId) -> Vec2 {
        let img = self.get(id);
        Vec2::new(img.width() as f32, img.height() as f32)
    }
}

impl Default for ImageStore {
    fn default() -> Self {
        Self::new()
    }
}

fn checkerboard() -> RgbaImage {
    let light = Rgba([205, 205, 210, 255]);
    let dark = Rgba([150, 150, 160, 255]);
    RgbaImage::from_fn(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, |x, y| {
        if (x / PLACEHOLDER_CELL + y / PLACEHOLDER_CELL) % 2 == 0 { light } else { dark }
    })
}
