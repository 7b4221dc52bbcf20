use bytemuck::{Pod, Zeroable};

use crate::coords::Rect;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};

use super::batch::QuadBatch;

/// Solid rectangle renderer.
///
/// Used for viewport backgrounds and chart plot areas.
pub struct RectRenderer {
    batch: QuadBatch,
}

impl Default for RectRenderer {
    fn default() -> Self {
        Self {
            batch: QuadBatch::new(
                "vizkit rect",
                concat!(include_str!("shaders/common.wgsl"), include_str!("shaders/rect.wgsl")),
                RectInstance::layout,
            ),
        }
    }
}

impl RectRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders all `DrawCmd::Rect` entries of `draw_list` into `target`.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        let (instances, clips) = collect_rects(draw_list);
        self.batch.draw(ctx, target, &instances, &clips);
    }
}

fn collect_rects(draw_list: &mut DrawList) -> (Vec<RectInstance>, Vec<Option<Rect>>) {
    let mut instances = Vec::new();
    let mut clips = Vec::new();

    for item in draw_list.iter_in_paint_order() {
        let DrawCmd::Rect(cmd) = &item.cmd else { continue };
        let r = cmd.rect.normalized();
        if r.is_empty() || cmd.color.a <= 0.0 {
            continue;
        }
        instances.push(RectInstance {
            origin: [r.origin.x, r.origin.y],
            size: [r.size.x, r.size.y],
            color: cmd.color.to_array(),
        });
        clips.push(item.clip_rect);
    }

    (instances, clips)
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct RectInstance {
    origin: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
}

impl RectInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // size
        3 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RectInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;
    use crate::scene::ZIndex;

    #[test]
    fn negative_rects_are_normalized_and_empty_ones_skipped() {
        let mut dl = DrawList::new();
        dl.push_rect(ZIndex::new(0), Rect::new(10.0, 10.0, -4.0, 2.0), Color::WHITE);
        dl.push_rect(ZIndex::new(0), Rect::new(0.0, 0.0, 0.0, 5.0), Color::WHITE);
        dl.push_rect(ZIndex::new(0), Rect::new(0.0, 0.0, 5.0, 5.0), Color::transparent());

        let (instances, clips) = collect_rects(&mut dl);
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].origin, [6.0, 10.0]);
        assert_eq!(instances[0].size, [4.0, 2.0]);
        assert_eq!(clips, vec![None]);
    }
}
