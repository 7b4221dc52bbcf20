use bytemuck::{Pod, Zeroable};

use crate::coords::Rect;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};

use super::batch::QuadBatch;

/// Renderer for `DrawCmd::Circle`.
///
/// Borders are rendered as an anti-aliased ring on the outer edge of the circle.
pub struct CircleRenderer {
    batch: QuadBatch,
}

impl Default for CircleRenderer {
    fn default() -> Self {
        Self {
            batch: QuadBatch::new(
                "vizkit circle",
                concat!(include_str!("shaders/common.wgsl"), include_str!("shaders/circle.wgsl")),
                CircleInstance::layout,
            ),
        }
    }
}

impl CircleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        let (instances, clips) = collect_circles(draw_list);
        self.batch.draw(ctx, target, &instances, &clips);
    }
}

fn collect_circles(draw_list: &mut DrawList) -> (Vec<CircleInstance>, Vec<Option<Rect>>) {
    let mut instances = Vec::new();
    let mut clips = Vec::new();

    for item in draw_list.iter_in_paint_order() {
        let DrawCmd::Circle(cmd) = &item.cmd else { continue };
        if cmd.radius <= 0.0 || !cmd.center.is_finite() {
            continue;
        }

        let (border_width, border_color) = match &cmd.border {
            Some(b) => (b.width.clamp(0.0, cmd.radius), b.color.to_array()),
            None => (0.0, [0.0; 4]),
        };

        instances.push(CircleInstance {
            center: [cmd.center.x, cmd.center.y],
            radius_bw: [cmd.radius, border_width],
            fill: cmd.fill.to_array(),
            border_color,
        });
        clips.push(item.clip_rect);
    }

    (instances, clips)
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct CircleInstance {
    center: [f32; 2],
    radius_bw: [f32; 2],
    fill: [f32; 4],
    border_color: [f32; 4],
}

impl CircleInstance {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        1 => Float32x2, // center
        2 => Float32x2, // radius, border width
        3 => Float32x4, // fill
        4 => Float32x4  // border color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CircleInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
