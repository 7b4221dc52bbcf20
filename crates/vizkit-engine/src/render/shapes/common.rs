//! Shared GPU types and utilities used by all shape renderers.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, Viewport};
use crate::render::{RenderCtx, RenderTarget};

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: component, alpha: component }
}

// ── viewport uniform ──────────────────────────────────────────────────────

/// Bound at group 0, binding 0 by every shape shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    pub viewport: [f32; 2],
    /// 1.0 when the fragment shader must gamma-encode its output.
    pub encode_srgb: f32,
    pub _pad: f32, // 16-byte alignment
}

impl ViewportUniform {
    pub(super) fn for_ctx(ctx: &RenderCtx<'_>) -> Self {
        Self {
            viewport: [ctx.viewport.width.max(1.0), ctx.viewport.height.max(1.0)],
            encode_srgb: if ctx.needs_srgb_encode() { 1.0 } else { 0.0 },
            _pad: 0.0,
        }
    }
}

pub(super) fn viewport_bind_group_layout_entry() -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<ViewportUniform>() as u64),
        },
        count: None,
    }
}

pub(super) fn create_viewport_ubo(ctx: &RenderCtx<'_>, label: &str) -> wgpu::Buffer {
    ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<ViewportUniform>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

pub(super) fn write_viewport_uniform(ctx: &RenderCtx<'_>, ubo: Option<&wgpu::Buffer>) {
    let Some(ubo) = ubo else { return };
    ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::for_ctx(ctx)));
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── pipeline ──────────────────────────────────────────────────────────────

/// Alpha-blended triangle-list pipeline with `vs_main`/`fs_main` entry points.
pub(super) fn create_blended_pipeline(
    ctx: &RenderCtx<'_>,
    label: &str,
    shader: &wgpu::ShaderModule,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    buffers: &[wgpu::VertexBufferLayout<'_>],
) -> wgpu::RenderPipeline {
    let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts,
        immediate_size: 0,
    });

    ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),

        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers,
        },

        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: Some(premul_alpha_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Opens a render pass that draws over the current target contents.
pub(super) fn begin_load_pass<'e>(
    target: &'e mut RenderTarget<'_>,
    label: &str,
) -> wgpu::RenderPass<'e> {
    target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target.color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}

// ── scissor rect ──────────────────────────────────────────────────────────

/// Converts a logical-pixel clip rect to physical scissor rect arguments for wgpu.
///
/// Returns `None` if the clip rect is zero-area (renderer should skip the draw call).
/// Returns `Some((x, y, w, h))` in physical pixels, clamped to the viewport.
///
/// `clip = None` means "no scissor" → returns the full viewport rect.
pub(super) fn logical_clip_to_scissor(
    clip: Option<Rect>,
    viewport: Viewport,
    scale: f32,
) -> Option<(u32, u32, u32, u32)> {
    let phys_vw = (viewport.width * scale).max(1.0) as u32;
    let phys_vh = (viewport.height * scale).max(1.0) as u32;

    let (x, y, w, h) = match clip {
        None => (0, 0, phys_vw, phys_vh),
        Some(r) => {
            let x  = ((r.origin.x * scale).max(0.0) as u32).min(phys_vw);
            let y  = ((r.origin.y * scale).max(0.0) as u32).min(phys_vh);
            let x2 = (((r.origin.x + r.size.x) * scale).max(0.0) as u32).min(phys_vw);
            let y2 = (((r.origin.y + r.size.y) * scale).max(0.0) as u32).min(phys_vh);
            (x, y, x2.saturating_sub(x), y2.saturating_sub(y))
        }
    };

    if w == 0 || h == 0 { None } else { Some((x, y, w, h)) }
}

/// Splits a per-item clip sequence into maximal runs of equal clip rects.
///
/// Each run becomes one instanced draw call with its own scissor.
pub(super) fn clip_runs(clips: &[Option<Rect>]) -> Vec<(Option<Rect>, Range<u32>)> {
    let mut runs = Vec::new();
    let mut i = 0usize;
    while i < clips.len() {
        let clip = clips[i];
        let mut j = i + 1;
        while j < clips.len() && clips[j] == clip {
            j += 1;
        }
        runs.push((clip, i as u32..j as u32));
        i = j;
    }
    runs
}

/// Grows `buffer` to at least `required` elements of `stride` bytes.
///
/// Returns the new capacity (next power of two, at least 64).
pub(super) fn ensure_vertex_capacity(
    ctx: &RenderCtx<'_>,
    buffer: &mut Option<wgpu::Buffer>,
    capacity: usize,
    required: usize,
    stride: usize,
    label: &str,
) -> usize {
    if required <= capacity && buffer.is_some() {
        return capacity;
    }

    let new_cap = required.next_power_of_two().max(64);
    *buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (new_cap * stride) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    }));
    new_cap
}
