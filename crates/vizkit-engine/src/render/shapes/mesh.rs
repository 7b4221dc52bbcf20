use std::ops::Range;

use crate::coords::Rect;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList, MeshVertex};

use super::common::{
    begin_load_pass,
    create_blended_pipeline,
    create_viewport_ubo,
    logical_clip_to_scissor,
    viewport_bind_group_layout_entry,
    write_viewport_uniform,
};

/// Renderer for `DrawCmd::Mesh`.
///
/// All meshes of a frame are concatenated into one vertex and one index
/// buffer. Each mesh keeps its own index range so clip rects still apply
/// per command, and triangles are drawn in the order they were recorded.
#[derive(Default)]
pub struct MeshRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,
    ibo: Option<wgpu::Buffer>,
    ibo_capacity: usize,
}

/// Merged geometry for one frame.
#[derive(Debug, Default, PartialEq)]
struct MeshBatch {
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
    /// Index range and clip rect per source command.
    draws: Vec<(Range<u32>, Option<Rect>)>,
}

impl MeshBatch {
    fn collect(draw_list: &mut DrawList) -> Self {
        let mut batch = MeshBatch::default();

        for item in draw_list.iter_in_paint_order() {
            let DrawCmd::Mesh(mesh) = &item.cmd else { continue };
            if mesh.is_empty() {
                continue;
            }

            let base = batch.vertices.len() as u32;
            let start = batch.indices.len() as u32;
            let vertex_count = mesh.vertices.len() as u32;

            batch.vertices.extend_from_slice(&mesh.vertices);
            // Whole triangles only; a triangle referencing a missing vertex is dropped.
            for tri in mesh.indices.chunks_exact(3) {
                if tri.iter().all(|&i| i < vertex_count) {
                    batch.indices.extend(tri.iter().map(|&i| i + base));
                }
            }

            let end = batch.indices.len() as u32;
            if end > start {
                batch.draws.push((start..end, item.clip_rect));
            }
        }

        batch
    }
}

impl MeshRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        let batch = MeshBatch::collect(draw_list);
        if batch.draws.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        write_viewport_uniform(ctx, self.viewport_ubo.as_ref());
        self.ensure_buffers(ctx, batch.vertices.len(), batch.indices.len());

        let Some(vbo) = self.vbo.as_ref() else { return };
        let Some(ibo) = self.ibo.as_ref() else { return };
        ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&batch.vertices));
        ctx.queue.write_buffer(ibo, 0, bytemuck::cast_slice(&batch.indices));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };

        let mut rpass = begin_load_pass(target, "vizkit mesh pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);

        for (range, clip) in batch.draws {
            if let Some((sx, sy, sw, sh)) =
                logical_clip_to_scissor(clip, ctx.viewport, ctx.scale_factor)
            {
                rpass.set_scissor_rect(sx, sy, sw, sh);
                rpass.draw_indexed(range, 0, 0..1);
            }
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("vizkit mesh shader"),
            source: wgpu::ShaderSource::Wgsl(
                concat!(include_str!("shaders/common.wgsl"), include_str!("shaders/mesh.wgsl")).into(),
            ),
        });

        let bind_group_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("vizkit mesh bgl"),
            entries: &[viewport_bind_group_layout_entry()],
        });

        let pipeline = create_blended_pipeline(
            ctx,
            "vizkit mesh pipeline",
            &shader,
            &[&bind_group_layout],
            &[mesh_vertex_layout()],
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let viewport_ubo = create_viewport_ubo(ctx, "vizkit mesh viewport ubo");
        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("vizkit mesh bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        }));
        self.viewport_ubo = Some(viewport_ubo);
    }

    fn ensure_buffers(&mut self, ctx: &RenderCtx<'_>, vertices: usize, indices: usize) {
        if vertices > self.vbo_capacity || self.vbo.is_none() {
            let cap = vertices.next_power_of_two().max(256);
            self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("vizkit mesh vbo"),
                size: (cap * std::mem::size_of::<MeshVertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.vbo_capacity = cap;
        }

        if indices > self.ibo_capacity || self.ibo.is_none() {
            let cap = indices.next_power_of_two().max(256);
            self.ibo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("vizkit mesh ibo"),
                size: (cap * std::mem::size_of::<u32>()) as u64,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.ibo_capacity = cap;
        }
    }
}

fn mesh_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x4  // color
    ];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRS,
    }
}
