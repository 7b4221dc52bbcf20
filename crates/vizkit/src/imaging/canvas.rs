use crate::error::Result;

use super::ImageData;

/// Paints filled primitives into an [`ImageData`].
///
/// Coordinates are pixel indices inside the extent; primitives are clipped
/// to it. The draw color is given per component in `[0, 255]`.
#[derive(Debug, Clone)]
pub struct ImageCanvasSource2D {
    image: ImageData,
    draw_color: [f64; 4],
}

impl ImageCanvasSource2D {
    /// 256 × 256 canvas with four components.
    pub fn new() -> Result<Self> {
        Ok(Self { image: ImageData::new([0, 255, 0, 255], 4)?, draw_color: [0.0; 4] })
    }

    /// Replaces the canvas with a zeroed one of the given extent.
    pub fn set_extent(&mut self, extent: [i32; 4]) -> Result<()> {
        self.image = ImageData::new(extent, self.image.components())?;
        Ok(())
    }

    /// Replaces the canvas with a zeroed one with `components` values per pixel.
    pub fn set_number_of_scalar_components(&mut self, components: usize) -> Result<()> {
        self.image = ImageData::new(self.image.extent(), components)?;
        Ok(())
    }

    /// Sets up to four components of the draw color; the rest are kept.
    pub fn set_draw_color(&mut self, color: &[f64]) {
        for (slot, v) in self.draw_color.iter_mut().zip(color) {
            *slot = *v;
        }
    }

    pub fn draw_color(&self) -> [f64; 4] {
        self.draw_color
    }

    fn value(&self) -> [u8; 4] {
        self.draw_color.map(|c| c.clamp(0.0, 255.0).round() as u8)
    }

    /// Fills `[x0, x1] × [y0, y1]`, corners in any order.
    pub fn fill_box(&mut self, x0: i32, x1: i32, y0: i32, y1: i32) {
        let [ex0, ex1, ey0, ey1] = self.image.extent();
        let value = self.value();
        for y in y0.min(y1).max(ey0)..=y0.max(y1).min(ey1) {
            for x in x0.min(x1).max(ex0)..=x0.max(x1).min(ex1) {
                self.image.set_pixel(x, y, &value);
            }
        }
    }

    /// Fills every pixel whose index lies inside or on the triangle.
    pub fn fill_triangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, x2: i32, y2: i32) {
        let p = [(x0, y0), (x1, y1), (x2, y2)].map(|(x, y)| (f64::from(x), f64::from(y)));
        let area = edge(p[0], p[1], p[2]);
        if area == 0.0 {
            return;
        }
        let value = self.value();
        let [ex0, ex1, ey0, ey1] = self.image.extent();
        for y in y0.min(y1).min(y2).max(ey0)..=y0.max(y1).max(y2).min(ey1) {
            for x in x0.min(x1).min(x2).max(ex0)..=x0.max(x1).max(x2).min(ex1) {
                let q = (f64::from(x), f64::from(y));
                let w = [edge(p[1], p[2], q), edge(p[2], p[0], q), edge(p[0], p[1], q)];
                if w.iter().all(|w| w * area >= 0.0) {
                    self.image.set_pixel(x, y, &value);
                }
            }
        }
    }

    /// Fills pixels within `radius` of the segment whose projection falls on it.
    pub fn fill_tube(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, radius: f64) {
        let (ax, ay) = (f64::from(x0), f64::from(y0));
        let (dx, dy) = (f64::from(x1) - ax, f64::from(y1) - ay);
        let len2 = dx * dx + dy * dy;
        if len2 == 0.0 || radius < 0.0 {
            return;
        }
        let value = self.value();
        // Saturating: a huge radius just covers the whole extent.
        let reach = radius.ceil() as i32;
        let [ex0, ex1, ey0, ey1] = self.image.extent();
        for y in y0.min(y1).saturating_sub(reach).max(ey0)..=y0.max(y1).saturating_add(reach).min(ey1) {
            for x in x0.min(x1).saturating_sub(reach).max(ex0)..=x0.max(x1).saturating_add(reach).min(ex1) {
                let (px, py) = (f64::from(x) - ax, f64::from(y) - ay);
                let t = (px * dx + py * dy) / len2;
                if !(0.0..=1.0).contains(&t) {
                    continue;
                }
                let (ox, oy) = (px - t * dx, py - t * dy);
                if ox * ox + oy * oy <= radius * radius {
                    self.image.set_pixel(x, y, &value);
                }
            }
        }
    }

    pub fn image(&self) -> &ImageData {
        &self.image
    }

    /// A copy of the current canvas.
    pub fn output(&self) -> ImageData {
        self.image.clone()
    }
}

/// Twice the signed area of `(a, b, c)`.
fn edge(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}
