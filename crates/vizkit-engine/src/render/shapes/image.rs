use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::Rect;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList, ImageCmd};

use super::common::{
    begin_load_pass,
    create_blended_pipeline,
    create_viewport_ubo,
    logical_clip_to_scissor,
    viewport_bind_group_layout_entry,
    write_viewport_uniform,
    QUAD_INDICES,
};

const UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// GPU copy of one `ImageHandle`.
struct CachedTexture {
    // Kept alive for the views/bind groups below.
    _texture: wgpu::Texture,
    linear: wgpu::BindGroup,
    nearest: wgpu::BindGroup,
    last_used: u64,
}

/// Renderer for `DrawCmd::Image`.
///
/// Textures are uploaded once per `ImageHandle` id as `Rgba8UnormSrgb` and
/// dropped after a frame in which they were not drawn.
#[derive(Default)]
pub struct ImageRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    viewport_ubo: Option<wgpu::Buffer>,
    sampler_linear: Option<wgpu::Sampler>,
    sampler_nearest: Option<wgpu::Sampler>,

    textures: HashMap<u64, CachedTexture>,
    frame: u64,

    quad_ibo: Option<wgpu::Buffer>,
    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,
}

impl ImageRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        self.frame += 1;

        let cmds: Vec<(ImageCmd, Option<Rect>)> = draw_list
            .iter_in_paint_order()
            .filter_map(|item| match &item.cmd {
                DrawCmd::Image(cmd) => Some((cmd.clone(), item.clip_rect)),
                _ => None,
            })
            .collect();

        if cmds.is_empty() {
            self.evict_unused();
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_shared(ctx);
        write_viewport_uniform(ctx, self.viewport_ubo.as_ref());

        for (cmd, _) in &cmds {
            self.ensure_texture(ctx, cmd);
        }
        self.evict_unused();

        let vertices = image_vertices(&cmds);
        self.ensure_vbo(ctx, vertices.len());

        let Some(vbo) = self.vbo.as_ref() else { return };
        ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&vertices));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };

        let mut rpass = begin_load_pass(target, "vizkit image pass");
        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        for (i, (cmd, clip)) in cmds.iter().enumerate() {
            let Some(cached) = self.textures.get(&cmd.image.id()) else { continue };
            let Some((sx, sy, sw, sh)) =
                logical_clip_to_scissor(*clip, ctx.viewport, ctx.scale_factor)
            else {
                continue;
            };

            let bind_group = if cmd.interpolate { &cached.linear } else { &cached.nearest };
            rpass.set_bind_group(0, bind_group, &[]);
            rpass.set_scissor_rect(sx, sy, sw, sh);
            rpass.draw_indexed(0..QUAD_INDICES.len() as u32, (i * 4) as i32, 0..1);
        }
    }

    fn evict_unused(&mut self) {
        let frame = self.frame;
        self.textures.retain(|_, t| t.last_used == frame);
    }

    fn ensure_texture(&mut self, ctx: &RenderCtx<'_>, cmd: &ImageCmd) {
        let id = cmd.image.id();
        if let Some(cached) = self.textures.get_mut(&id) {
            cached.last_used = self.frame;
            return;
        }

        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        let Some(linear) = self.sampler_linear.as_ref() else { return };
        let Some(nearest) = self.sampler_nearest.as_ref() else { return };

        let image = &cmd.image;
        let texture = ctx.device.create_texture_with_data(
            ctx.queue,
            &wgpu::TextureDescriptor {
                label: Some("vizkit image texture"),
                size: wgpu::Extent3d {
                    width: image.width(),
                    height: image.height(),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            image.pixels(),
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let make_group = |sampler: &wgpu::Sampler| {
            ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("vizkit image bind group"),
                layout: bgl,
                entries: &[
                    wgpu::BindGroupEntry { binding: 0, resource: ubo.as_entire_binding() },
                    wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(&view) },
                    wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::Sampler(sampler) },
                ],
            })
        };

        let cached = CachedTexture {
            linear: make_group(linear),
            nearest: make_group(nearest),
            _texture: texture,
            last_used: self.frame,
        };
        log::debug!("uploaded image {id} ({}x{})", image.width(), image.height());
        self.textures.insert(id, cached);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("vizkit image shader"),
            source: wgpu::ShaderSource::Wgsl(
                concat!(include_str!("shaders/common.wgsl"), include_str!("shaders/image.wgsl")).into(),
            ),
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("vizkit image bgl"),
            entries: &[
                viewport_bind_group_layout_entry(),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline = create_blended_pipeline(
            ctx,
            "vizkit image pipeline",
            &shader,
            &[&bgl],
            &[ImageVertex::layout()],
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);
        // Bind groups reference the old layout.
        self.textures.clear();
    }

    fn ensure_shared(&mut self, ctx: &RenderCtx<'_>) {
        if self.viewport_ubo.is_none() {
            self.viewport_ubo = Some(create_viewport_ubo(ctx, "vizkit image viewport ubo"));
        }

        let sampler = |filter: wgpu::FilterMode, label: &str| {
            ctx.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some(label),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: filter,
                min_filter: filter,
                mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                ..Default::default()
            })
        };
        if self.sampler_linear.is_none() {
            self.sampler_linear = Some(sampler(wgpu::FilterMode::Linear, "vizkit image linear"));
        }
        if self.sampler_nearest.is_none() {
            self.sampler_nearest = Some(sampler(wgpu::FilterMode::Nearest, "vizkit image nearest"));
        }

        if self.quad_ibo.is_none() {
            self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("vizkit image ibo"),
                contents: bytemuck::cast_slice(&QUAD_INDICES),
                usage: wgpu::BufferUsages::INDEX,
            }));
        }
    }

    fn ensure_vbo(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.vbo_capacity && self.vbo.is_some() {
            return;
        }
        let cap = required.next_power_of_two().max(16);
        self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("vizkit image vbo"),
            size: (cap * std::mem::size_of::<ImageVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vbo_capacity = cap;
    }
}

/// Four vertices per command, corners paired with the unit-square UVs.
fn image_vertices(cmds: &[(ImageCmd, Option<Rect>)]) -> Vec<ImageVertex> {
    cmds.iter()
        .flat_map(|(cmd, _)| {
            let opacity = cmd.opacity.clamp(0.0, 1.0);
            cmd.corners.iter().zip(UVS).map(move |(p, uv)| ImageVertex {
                pos: [p.x, p.y],
                uv,
                opacity: [opacity, 0.0],
            })
        })
        .collect()
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct ImageVertex {
    pos: [f32; 2],
    uv: [f32; 2],
    opacity: [f32; 2], // x: opacity, y: unused
}

impl ImageVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2, // uv
        2 => Float32x2  // opacity
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ImageVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::scene::ImageHandle;

    #[test]
    fn vertices_pair_corners_with_uvs() {
        let Some(image) = ImageHandle::new(1, 1, vec![0, 0, 0, 255]) else {
            panic!("valid image");
        };
        let corners = [
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let cmd = ImageCmd { image, corners, interpolate: false, opacity: 2.0 };
        let verts = image_vertices(&[(cmd, None)]);

        assert_eq!(verts.len(), 4);
        assert_eq!(verts[2].pos, [4.0, 2.0]);
        assert_eq!(verts[2].uv, [1.0, 1.0]);
        assert_eq!(verts[3].uv, [0.0, 1.0]);
        assert_eq!(verts[0].opacity, [1.0, 0.0]);
    }
}
