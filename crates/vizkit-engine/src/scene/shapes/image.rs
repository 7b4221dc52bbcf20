use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::coords::Vec2;
use crate::scene::{DrawCmd, DrawList, ZIndex};

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Shared RGBA8 pixel buffer (straight alpha, sRGB, top row first).
///
/// Identity is the id assigned at construction; renderers cache GPU
/// textures per id. Build a new handle whenever the pixels change.
#[derive(Clone)]
pub struct ImageHandle {
    id: u64,
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl ImageHandle {
    /// Wraps `pixels`, or returns `None` when its length is not `width * height * 4`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || pixels.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            id: NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed),
            width,
            height,
            pixels: pixels.into(),
        })
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl PartialEq for ImageHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("id", &self.id)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Textured quad with arbitrary corners.
///
/// `corners` are in logical pixels, in the order of the texture's
/// top-left, top-right, bottom-right, bottom-left.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCmd {
    pub image: ImageHandle,
    pub corners: [Vec2; 4],
    /// Linear filtering when true, nearest otherwise.
    pub interpolate: bool,
    pub opacity: f32,
}

impl DrawList {
    /// Records an image quad.
    #[inline]
    pub fn push_image(
        &mut self,
        z: ZIndex,
        image: ImageHandle,
        corners: [Vec2; 4],
        interpolate: bool,
        opacity: f32,
    ) {
        self.push(z, DrawCmd::Image(ImageCmd { image, corners, interpolate, opacity }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_rejects_wrong_length() {
        assert!(ImageHandle::new(2, 2, vec![0; 15]).is_none());
        assert!(ImageHandle::new(0, 2, vec![]).is_none());
        assert!(ImageHandle::new(2, 2, vec![0; 16]).is_some());
    }

    #[test]
    fn handles_compare_by_identity() {
        let a = ImageHandle::new(1, 1, vec![255; 4]);
        let b = ImageHandle::new(1, 1, vec![255; 4]);
        assert!(a.is_some() && b.is_some());
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
