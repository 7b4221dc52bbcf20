use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};

use crate::error::{Result, VizError};
use crate::math::{Bounds, Vec3};

/// Structured 2D grid of `u8` scalars.
///
/// Pixels are stored row by row starting at the bottom row (`y0`), with
/// `components` interleaved values per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    extent: [i32; 4],
    spacing: [f64; 3],
    origin: [f64; 3],
    components: usize,
    scalars: Vec<u8>,
}

impl ImageData {
    /// Zero-filled image covering `[x0, x1] × [y0, y1]` (inclusive).
    pub fn new(extent: [i32; 4], components: usize) -> Result<Self> {
        let [x0, x1, y0, y1] = extent;
        if x1 < x0 || y1 < y0 {
            return Err(VizError::InvalidImage(format!("empty extent {extent:?}")));
        }
        if !(1..=4).contains(&components) {
            return Err(VizError::InvalidImage(format!("{components} scalar components")));
        }
        let too_large = || VizError::InvalidImage(format!("extent {extent:?} is too large"));
        let [w, h] = span(extent);
        let len = usize::try_from(w)
            .ok()
            .zip(usize::try_from(h).ok())
            .and_then(|(w, h)| w.checked_mul(h)?.checked_mul(components))
            .ok_or_else(too_large)?;
        let mut scalars = Vec::new();
        scalars.try_reserve_exact(len).map_err(|_| too_large())?;
        scalars.resize(len, 0);
        Ok(Self { extent, spacing: [1.0; 3], origin: [0.0; 3], components, scalars })
    }

    pub fn extent(&self) -> [i32; 4] {
        self.extent
    }

    /// Width and height in pixels.
    pub fn dimensions(&self) -> [usize; 2] {
        // `new` checked that both sides fit in usize.
        span(self.extent).map(|n| n as usize)
    }

    pub fn components(&self) -> usize {
        self.components
    }

    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    pub fn set_spacing(&mut self, spacing: [f64; 3]) {
        self.spacing = spacing;
    }

    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    pub fn set_origin(&mut self, origin: [f64; 3]) {
        self.origin = origin;
    }

    pub fn scalars(&self) -> &[u8] {
        &self.scalars
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        let [x0, x1, y0, y1] = self.extent;
        if x < x0 || x > x1 || y < y0 || y > y1 {
            return None;
        }
        let [w, _] = self.dimensions();
        let (dx, dy) = (i64::from(x) - i64::from(x0), i64::from(y) - i64::from(y0));
        Some((dy as usize * w + dx as usize) * self.components)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<&[u8]> {
        let at = self.offset(x, y)?;
        Some(&self.scalars[at..at + self.components])
    }

    /// Writes the first `components` values of `value`. Out-of-extent pixels are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, value: &[u8]) {
        if let Some(at) = self.offset(x, y) {
            let n = self.components.min(value.len());
            self.scalars[at..at + n].copy_from_slice(&value[..n]);
        }
    }

    /// World position of pixel `(i, j)`'s center.
    pub fn world_point(&self, i: f64, j: f64) -> Vec3 {
        Vec3::new(
            self.origin[0] + self.spacing[0] * i,
            self.origin[1] + self.spacing[1] * j,
            self.origin[2],
        )
    }

    /// Bounds of the pixel centers.
    pub fn bounds(&self) -> Bounds {
        let [x0, x1, y0, y1] = self.extent.map(f64::from);
        let mut b = Bounds::empty();
        b.add_point(self.world_point(x0, y0));
        b.add_point(self.world_point(x1, y1));
        b
    }

    /// Straight-alpha RGBA8 with the top row first.
    pub fn to_rgba_top_down(&self) -> Vec<u8> {
        let [w, h] = self.dimensions();
        let mut out = Vec::with_capacity(w * h * 4);
        for row in (0..h).rev() {
            let start = row * w * self.components;
            for px in self.scalars[start..start + w * self.components].chunks_exact(self.components) {
                let rgba = match *px {
                    [l] => [l, l, l, 255],
                    [l, a] => [l, l, l, a],
                    [r, g, b] => [r, g, b, 255],
                    [r, g, b, a] => [r, g, b, a],
                    _ => [0, 0, 0, 255],
                };
                out.extend_from_slice(&rgba);
            }
        }
        out
    }

    fn rows_top_down(&self) -> Vec<u8> {
        let [w, _] = self.dimensions();
        let stride = w * self.components;
        self.scalars.chunks_exact(stride).rev().flatten().copied().collect()
    }

    /// Converts to an `image` buffer with matching channel layout.
    pub(crate) fn to_dynamic(&self) -> Result<DynamicImage> {
        let [w, h] = self.dimensions();
        let (w, h) = (w as u32, h as u32);
        let raw = self.rows_top_down();
        let invalid = || VizError::InvalidImage("scalar buffer does not match extent".into());
        Ok(match self.components {
            1 => DynamicImage::ImageLuma8(GrayImage::from_raw(w, h, raw).ok_or_else(invalid)?),
            2 => DynamicImage::ImageLumaA8(GrayAlphaImage::from_raw(w, h, raw).ok_or_else(invalid)?),
            3 => DynamicImage::ImageRgb8(RgbImage::from_raw(w, h, raw).ok_or_else(invalid)?),
            _ => DynamicImage::ImageRgba8(RgbaImage::from_raw(w, h, raw).ok_or_else(invalid)?),
        })
    }

    /// Builds an image with extent `[0, w-1] × [0, h-1]` from a decoded file.
    ///
    /// Grey images keep one (or two, with alpha) components; color images
    /// keep three, or four with alpha.
    pub(crate) fn from_dynamic(img: DynamicImage) -> Result<Self> {
        let (w, h) = (img.width(), img.height());
        if w == 0 || h == 0 {
            return Err(VizError::InvalidImage("decoded image is empty".into()));
        }
        let color = img.color();
        let (components, raw) = match (color.has_color(), color.has_alpha()) {
            (false, false) => (1, img.into_luma8().into_raw()),
            (false, true) => (2, img.into_luma_alpha8().into_raw()),
            (true, false) => (3, img.into_rgb8().into_raw()),
            (true, true) => (4, img.into_rgba8().into_raw()),
        };
        let mut data = ImageData::new([0, w as i32 - 1, 0, h as i32 - 1], components)?;
        let stride = w as usize * components;
        data.scalars = raw.chunks_exact(stride).rev().flatten().copied().collect();
        Ok(data)
    }
}

/// Inclusive width and height of an extent, widened so no side overflows.
fn span([x0, x1, y0, y1]: [i32; 4]) -> [i64; 2] {
    [i64::from(x1) - i64::from(x0) + 1, i64::from(y1) - i64::from(y0) + 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_shapes() {
        assert!(ImageData::new([0, -1, 0, 0], 3).is_err());
        assert!(ImageData::new([0, 1, 0, 1], 5).is_err());
        assert!(ImageData::new([0, 1, 0, 1], 0).is_err());
    }

    #[test]
    fn huge_extent_is_an_error() {
        let err = ImageData::new([i32::MIN, i32::MAX, i32::MIN, i32::MAX], 4).unwrap_err();
        assert!(matches!(err, VizError::InvalidImage(_)));
        assert_eq!(span([i32::MIN, i32::MAX, 0, 0]), [1 << 32, 1]);
    }

    #[test]
    fn negative_extent_origin_is_addressable() {
        let mut img = ImageData::new([-3, -1, -2, -2], 1).unwrap();
        assert_eq!(img.dimensions(), [3, 1]);
        img.set_pixel(-1, -2, &[7]);
        assert_eq!(img.scalars(), &[0, 0, 7]);
    }

    #[test]
    fn pixels_are_addressed_by_extent() {
        let mut img = ImageData::new([5, 7, 10, 11], 3).unwrap();
        assert_eq!(img.dimensions(), [3, 2]);
        img.set_pixel(6, 11, &[1, 2, 3]);
        assert_eq!(img.pixel(6, 11), Some(&[1u8, 2, 3][..]));
        assert_eq!(img.pixel(4, 10), None);
        img.set_pixel(100, 100, &[9, 9, 9]);
    }

    #[test]
    fn rgba_export_puts_top_row_first() {
        let mut img = ImageData::new([0, 0, 0, 1], 1).unwrap();
        img.set_pixel(0, 0, &[10]);
        img.set_pixel(0, 1, &[200]);
        assert_eq!(img.to_rgba_top_down(), vec![200, 200, 200, 255, 10, 10, 10, 255]);
    }

    #[test]
    fn dynamic_conversion_round_trips_rows() {
        let mut img = ImageData::new([0, 1, 0, 1], 3).unwrap();
        img.set_pixel(0, 0, &[255, 0, 0]);
        img.set_pixel(1, 1, &[0, 0, 255]);
        let dynamic = img.to_dynamic().unwrap();
        // Image row 0 is the top of the picture.
        let rgb = dynamic.to_rgb8();
        assert_eq!(rgb.get_pixel(0, 1).0, [255, 0, 0]);
        assert_eq!(rgb.get_pixel(1, 0).0, [0, 0, 255]);

        let back = ImageData::from_dynamic(dynamic).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn bounds_follow_origin_and_spacing() {
        let mut img = ImageData::new([0, 9, 0, 4], 1).unwrap();
        img.set_origin([1.0, 2.0, 0.0]);
        img.set_spacing([0.5, 2.0, 1.0]);
        assert_eq!(img.bounds().0, [1.0, 5.5, 2.0, 10.0, 0.0, 0.0]);
    }
}
