use bytemuck::{Pod, Zeroable};

use crate::coords::Rect;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};

use super::batch::QuadBatch;

/// Renderer for `DrawCmd::Line`.
///
/// Each segment is a unit quad stretched along the segment in the vertex
/// shader and widened by half a pixel on each side for anti-aliasing.
pub struct LineRenderer {
    batch: QuadBatch,
}

impl Default for LineRenderer {
    fn default() -> Self {
        Self {
            batch: QuadBatch::new(
                "vizkit line",
                concat!(include_str!("shaders/common.wgsl"), include_str!("shaders/line.wgsl")),
                LineInstance::layout,
            ),
        }
    }
}

impl LineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        let mut instances = Vec::new();
        let mut clips: Vec<Option<Rect>> = Vec::new();

        for item in draw_list.iter_in_paint_order() {
            let DrawCmd::Line(cmd) = &item.cmd else { continue };
            if !cmd.p0.is_finite() || !cmd.p1.is_finite() {
                continue;
            }
            instances.push(LineInstance {
                p0: [cmd.p0.x, cmd.p0.y],
                p1: [cmd.p1.x, cmd.p1.y],
                width: [cmd.width.max(0.5), 0.0],
                color: cmd.color.to_array(),
            });
            clips.push(item.clip_rect);
        }

        self.batch.draw(ctx, target, &instances, &clips);
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct LineInstance {
    p0: [f32; 2],
    p1: [f32; 2],
    width: [f32; 2], // x: width, y: unused
    color: [f32; 4],
}

impl LineInstance {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        1 => Float32x2, // p0
        2 => Float32x2, // p1
        3 => Float32x2, // width
        4 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
