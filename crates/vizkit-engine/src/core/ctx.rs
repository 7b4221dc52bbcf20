use winit::window::Window;

use crate::coords::Viewport;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::{InputFrame, InputState};
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};

use super::app::AppControl;

/// The open window, borrowed for one frame.
pub struct WindowCtx<'a> {
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Returns the logical window size as `(width, height)` in logical pixels.
    pub fn logical_size(&self) -> (f32, f32) {
        let phys  = self.window.inner_size();
        let scale = self.window.scale_factor();
        let logi: winit::dpi::LogicalSize<f64> = phys.to_logical(scale);
        (logi.width as f32, logi.height as f32)
    }

    /// Physical pixels per logical pixel.
    pub fn scale_factor(&self) -> f32 {
        self.window.scale_factor() as f32
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window:      WindowCtx<'a>,
    pub gpu:         &'a mut Gpu<'w>,
    pub input:       &'a InputState,
    pub input_frame: &'a InputFrame,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Clears the surface with `clear`, calls `draw` with a ready [`RenderCtx`] and
    /// [`RenderTarget`], then presents the frame.
    ///
    /// Surface errors are mapped through [`Gpu::handle_surface_error`]; only a
    /// fatal one turns into [`AppControl::Exit`].
    pub fn render<F>(&mut self, clear: Color, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let (w, h) = self.window.logical_size();
        if w <= 0.0 || h <= 0.0 {
            // Minimized.
            return AppControl::Continue;
        }
        let scale_factor = self.window.scale_factor();

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let action = self.gpu.handle_surface_error(err);
                if action == SurfaceErrorAction::Fatal {
                    log::error!("unrecoverable surface error; closing");
                    return AppControl::Exit;
                }
                return AppControl::Continue;
            }
        };

        // Clear pass, dropped before the encoder is moved into submit().
        {
            let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("vizkit clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view:           &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load:  wgpu::LoadOp::Clear(clear_value(clear, self.gpu.surface_format())),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes:         None,
                occlusion_query_set:      None,
                multiview_mask:           None,
            });
        }

        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            Viewport::new(w, h),
            scale_factor,
        );

        // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            draw(&rctx, &mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}

/// Clear color as the surface expects it: linear for sRGB formats, encoded otherwise.
fn clear_value(clear: Color, format: wgpu::TextureFormat) -> wgpu::Color {
    let [r, g, b, a] = if format.is_srgb() {
        clear.to_array()
    } else {
        let [r, g, b, a] = clear.to_srgb();
        [r * a, g * a, b * a, a]
    };
    wgpu::Color { r: r as f64, g: g as f64, b: b as f64, a: a as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_value_is_linear_on_srgb_surfaces() {
        let c = Color::from_srgb(0.5, 0.5, 0.5, 1.0);
        let v = clear_value(c, wgpu::TextureFormat::Bgra8UnormSrgb);
        assert!((v.r - c.r as f64).abs() < 1e-6);
        let v = clear_value(c, wgpu::TextureFormat::Bgra8Unorm);
        assert!((v.r - 0.5).abs() < 1e-3);
    }
}
