use vizkit_engine::coords::{Rect, Vec2};
use vizkit_engine::scene::ImageHandle;

use crate::camera::Camera;
use crate::error::{Result, VizError};
use crate::math::{Bounds, Vec3};
use crate::painter::Painter;

use super::ImageData;

/// Shows an [`ImageData`] as a textured quad in the z = origin plane.
///
/// Pixel `(i, j)` covers `origin + spacing * [i ± 0.5, j ± 0.5]`.
#[derive(Debug, Clone)]
pub struct ImageActor {
    image: ImageData,
    handle: ImageHandle,
    /// Linear filtering when magnified; nearest otherwise.
    pub interpolate: bool,
    pub opacity: f64,
    pub visibility: bool,
}

impl ImageActor {
    pub fn new(image: ImageData) -> Result<Self> {
        let handle = upload(&image)?;
        Ok(Self { image, handle, interpolate: true, opacity: 1.0, visibility: true })
    }

    pub fn input(&self) -> &ImageData {
        &self.image
    }

    pub fn set_input_data(&mut self, image: ImageData) -> Result<()> {
        self.handle = upload(&image)?;
        self.image = image;
        Ok(())
    }

    /// Corners of the displayed quad: top-left, top-right, bottom-right,
    /// bottom-left as seen with +y up.
    pub fn world_corners(&self) -> [Vec3; 4] {
        let [x0, x1, y0, y1] = self.image.extent().map(f64::from);
        let (l, r, b, t) = (x0 - 0.5, x1 + 0.5, y0 - 0.5, y1 + 0.5);
        [
            self.image.world_point(l, t),
            self.image.world_point(r, t),
            self.image.world_point(r, b),
            self.image.world_point(l, b),
        ]
    }

    pub fn bounds(&self) -> Bounds {
        let mut b = Bounds::empty();
        for c in self.world_corners() {
            b.add_point(c);
        }
        b
    }

    pub(crate) fn paint(&self, painter: &mut Painter<'_>, camera: &Camera, viewport: Rect) {
        if !self.visibility {
            return;
        }
        let mut corners = [Vec2::zero(); 4];
        for (slot, world) in corners.iter_mut().zip(self.world_corners()) {
            match camera.world_to_display(world, viewport) {
                Some(p) => *slot = p.pos,
                None => return,
            }
        }
        painter.image(self.handle.clone(), corners, self.interpolate, self.opacity.clamp(0.0, 1.0) as f32);
    }
}

fn upload(image: &ImageData) -> Result<ImageHandle> {
    let [w, h] = image.dimensions();
    ImageHandle::new(w as u32, h as u32, image.to_rgba_top_down())
        .ok_or_else(|| VizError::InvalidImage(format!("cannot display {w}x{h} image")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_extend_half_a_pixel() {
        let mut img = ImageData::new([0, 9, 0, 9], 3).unwrap();
        img.set_spacing([2.0, 1.0, 1.0]);
        let actor = ImageActor::new(img).unwrap();
        assert_eq!(actor.bounds().0, [-1.0, 19.0, -0.5, 9.5, 0.0, 0.0]);
        let [tl, _, br, _] = actor.world_corners();
        assert_eq!(tl, Vec3::new(-1.0, 9.5, 0.0));
        assert_eq!(br, Vec3::new(19.0, -0.5, 0.0));
    }

    #[test]
    fn replacing_input_refreshes_the_texture() {
        let mut actor = ImageActor::new(ImageData::new([0, 1, 0, 1], 1).unwrap()).unwrap();
        let first = actor.handle.id();
        actor.set_input_data(ImageData::new([0, 3, 0, 3], 1).unwrap()).unwrap();
        assert_ne!(actor.handle.id(), first);
        assert_eq!(actor.input().dimensions(), [4, 4]);
    }
}
