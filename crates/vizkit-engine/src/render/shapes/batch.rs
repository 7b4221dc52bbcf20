//! Instanced unit-quad pipeline shared by the rect, circle and line renderers.

use bytemuck::Pod;
use wgpu::util::DeviceExt;

use crate::coords::Rect;
use crate::render::{RenderCtx, RenderTarget};

use super::common::{
    begin_load_pass,
    clip_runs,
    create_blended_pipeline,
    create_viewport_ubo,
    ensure_vertex_capacity,
    logical_clip_to_scissor,
    viewport_bind_group_layout_entry,
    write_viewport_uniform,
    QuadVertex,
    QUAD_INDICES,
    QUAD_VERTICES,
};

/// GPU state for one instanced quad shader.
///
/// The shader reads the unit quad at location 0 and the per-instance
/// attributes described by `instance_layout` from location 1 on.
pub(super) struct QuadBatch {
    label: &'static str,
    shader_src: &'static str,
    instance_layout: fn() -> wgpu::VertexBufferLayout<'static>,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl QuadBatch {
    pub(super) fn new(
        label: &'static str,
        shader_src: &'static str,
        instance_layout: fn() -> wgpu::VertexBufferLayout<'static>,
    ) -> Self {
        Self {
            label,
            shader_src,
            instance_layout,
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            viewport_ubo: None,
            quad_vbo: None,
            quad_ibo: None,
            instance_vbo: None,
            instance_capacity: 0,
        }
    }

    /// Uploads `instances` and draws them in one pass, one draw call per run
    /// of equal clip rects. `clips[i]` is the clip of `instances[i]`.
    pub(super) fn draw<I: Pod>(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        instances: &[I],
        clips: &[Option<Rect>],
    ) {
        debug_assert_eq!(instances.len(), clips.len());
        if instances.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);

        // Mutating methods must happen before borrowing pipeline/buffers immutably.
        write_viewport_uniform(ctx, self.viewport_ubo.as_ref());
        self.instance_capacity = ensure_vertex_capacity(
            ctx,
            &mut self.instance_vbo,
            self.instance_capacity,
            instances.len(),
            std::mem::size_of::<I>(),
            self.label,
        );

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(instances));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };

        let mut rpass = begin_load_pass(target, self.label);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        for (clip, range) in clip_runs(clips) {
            if let Some((sx, sy, sw, sh)) =
                logical_clip_to_scissor(clip, ctx.viewport, ctx.scale_factor)
            {
                rpass.set_scissor_rect(sx, sy, sw, sh);
                rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, range);
            }
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.label),
            source: wgpu::ShaderSource::Wgsl(self.shader_src.into()),
        });

        let bind_group_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(self.label),
            entries: &[viewport_bind_group_layout_entry()],
        });

        let pipeline = create_blended_pipeline(
            ctx,
            self.label,
            &shader,
            &[&bind_group_layout],
            &[QuadVertex::layout(), (self.instance_layout)()],
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

        let viewport_ubo = create_viewport_ubo(ctx, self.label);
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(self.label),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(self.label),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(self.label),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }
}
