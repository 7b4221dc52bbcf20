use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};
use wgpu::util::DeviceExt;

use crate::coords::Rect;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList, TextCmd};
use crate::text::FontSystem;

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

// ── atlas constants ────────────────────────────────────────────────────────

const ATLAS_SIZE: u32 = 1024;
const GLYPH_PADDING: u32 = 1; // pixels between glyphs in the atlas

// ── shelf packer ───────────────────────────────────────────────────────────

/// Row-based ("shelf") allocator for the glyph atlas.
#[derive(Debug)]
struct ShelfPacker {
    size: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
}

impl ShelfPacker {
    fn new(size: u32) -> Self {
        Self {
            size,
            cursor_x: GLYPH_PADDING,
            cursor_y: GLYPH_PADDING,
            row_height: 0,
            full: false,
        }
    }

    /// Reserves a `w × h` cell and returns its top-left corner.
    fn allocate(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.full {
            return None;
        }

        if self.cursor_x + w + GLYPH_PADDING > self.size {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }

        if self.cursor_y + h + GLYPH_PADDING > self.size || w + 2 * GLYPH_PADDING > self.size {
            self.full = true;
            return None;
        }

        let at = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        Some(at)
    }
}

// ── cached glyph ──────────────────────────────────────────────────────────

struct CachedGlyph {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Renderer for `DrawCmd::Text`.
///
/// Maintains an R8Unorm glyph atlas. Glyphs are rasterized on first use via
/// fontdue and cached for the renderer's lifetime, keyed by
/// `GlyphRasterConfig` (font, glyph index, pixel size). Glyphs are rasterized
/// at physical size so text stays crisp on high-DPI displays.
pub struct TextRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    atlas_texture: Option<wgpu::Texture>,
    atlas_view: Option<wgpu::TextureView>,
    packer: ShelfPacker,
    warned_full: bool,

    glyph_cache: HashMap<GlyphRasterConfig, CachedGlyph>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,
    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,

    layout: Layout<()>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            viewport_ubo: None,
            sampler: None,
            atlas_texture: None,
            atlas_view: None,
            packer: ShelfPacker::new(ATLAS_SIZE),
            warned_full: false,
            glyph_cache: HashMap::new(),
            quad_vbo: None,
            quad_ibo: None,
            instance_vbo: None,
            instance_capacity: 0,
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders all `DrawCmd::Text` entries in `draw_list`.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        font_system: &FontSystem,
    ) {
        let cmds: Vec<(TextCmd, Option<Rect>)> = draw_list
            .iter_in_paint_order()
            .filter_map(|item| match &item.cmd {
                DrawCmd::Text(cmd) => Some((cmd.clone(), item.clip_rect)),
                _ => None,
            })
            .collect();
        if cmds.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_atlas(ctx);
        self.ensure_bindings(ctx);
        self.ensure_static_buffers(ctx);

        let scale = ctx.scale_factor.max(0.25);
        let mut instances: Vec<GlyphInstance> = Vec::new();
        let mut clips: Vec<Option<Rect>> = Vec::new();

        for (cmd, clip) in &cmds {
            let Some(font) = font_system.get(cmd.font) else {
                log::warn!("TextRenderer: unknown FontId {:?}, skipping", cmd.font);
                continue;
            };

            // Lay out in physical pixels, then map back to logical.
            self.layout.reset(&LayoutSettings {
                x: (cmd.origin.x * scale).round(),
                y: (cmd.origin.y * scale).round(),
                max_width: cmd.max_width.map(|w| w * scale),
                ..LayoutSettings::default()
            });
            self.layout.append(&[font], &TextStyle::new(&cmd.text, cmd.size * scale, 0));

            // Snapshot so the borrow on `self.layout` ends before glyph upload.
            let glyphs: Vec<(GlyphRasterConfig, f32, f32, usize, usize)> = self
                .layout
                .glyphs()
                .iter()
                .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
                .map(|g| (g.key, g.x, g.y, g.width, g.height))
                .collect();

            for (key, x, y, w, h) in glyphs {
                if !self.glyph_cache.contains_key(&key) {
                    let (metrics, bitmap) = font.rasterize_config(key);
                    if metrics.width == 0 || metrics.height == 0 {
                        continue;
                    }
                    if let Some(entry) =
                        self.upload_glyph(ctx, &bitmap, metrics.width as u32, metrics.height as u32)
                    {
                        self.glyph_cache.insert(key, entry);
                    }
                }

                let Some(cached) = self.glyph_cache.get(&key) else { continue };

                instances.push(GlyphInstance {
                    dst_min: [x / scale, y / scale],
                    dst_max: [(x + w as f32) / scale, (y + h as f32) / scale],
                    uv_min: cached.uv_min,
                    uv_max: cached.uv_max,
                    color: cmd.color.to_array(),
                });
                clips.push(*clip);
            }
        }

        if instances.is_empty() {
            return;
        }

        write_viewport_uniform(ctx, self.viewport_ubo.as_ref());
        self.instance_capacity = ensure_vertex_capacity(
            ctx,
            &mut self.instance_vbo,
            self.instance_capacity,
            instances.len(),
            std::mem::size_of::<GlyphInstance>(),
            "vizkit text instance vbo",
        );

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&instances));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };

        let mut rpass = begin_load_pass(target, "vizkit text pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        for (clip, range) in clip_runs(&clips) {
            if let Some((sx, sy, sw, sh)) =
                logical_clip_to_scissor(clip, ctx.viewport, ctx.scale_factor)
            {
                rpass.set_scissor_rect(sx, sy, sw, sh);
                rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, range);
            }
        }
    }

    // ── atlas helpers ──────────────────────────────────────────────────────

    fn upload_glyph(
        &mut self,
        ctx: &RenderCtx<'_>,
        bitmap: &[u8],
        w: u32,
        h: u32,
    ) -> Option<CachedGlyph> {
        let Some((gx, gy)) = self.packer.allocate(w, h) else {
            if !self.warned_full {
                log::warn!(
                    "TextRenderer: glyph atlas is full ({ATLAS_SIZE}x{ATLAS_SIZE}); \
                     some glyphs will not be rendered"
                );
                self.warned_full = true;
            }
            return None;
        };

        let atlas = self.atlas_texture.as_ref()?;

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: atlas,
                mip_level: 0,
                origin: wgpu::Origin3d { x: gx, y: gy, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            bitmap,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );

        let atlas_f = ATLAS_SIZE as f32;
        Some(CachedGlyph {
            uv_min: [gx as f32 / atlas_f, gy as f32 / atlas_f],
            uv_max: [(gx + w) as f32 / atlas_f, (gy + h) as f32 / atlas_f],
        })
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("vizkit text shader"),
            source: wgpu::ShaderSource::Wgsl(
                concat!(include_str!("shaders/common.wgsl"), include_str!("shaders/text.wgsl")).into(),
            ),
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("vizkit text bgl"),
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
            "vizkit text pipeline",
            &shader,
            &[&bgl],
            &[QuadVertex::layout(), GlyphInstance::layout()],
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
    }

    fn ensure_atlas(&mut self, ctx: &RenderCtx<'_>) {
        if self.atlas_texture.is_some() {
            return;
        }

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("vizkit text atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.atlas_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.atlas_texture = Some(texture);
        self.packer = ShelfPacker::new(ATLAS_SIZE);
        self.glyph_cache.clear();
        self.bind_group = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_none() {
            self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("vizkit text sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                ..Default::default()
            }));
        }
        if self.viewport_ubo.is_none() {
            self.viewport_ubo = Some(create_viewport_ubo(ctx, "vizkit text viewport ubo"));
        }
        if self.bind_group.is_some() {
            return;
        }

        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(atlas_view) = self.atlas_view.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };
        let Some(viewport_ubo) = self.viewport_ubo.as_ref() else { return };

        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("vizkit text bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: viewport_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(atlas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        }));
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }
        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vizkit text quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vizkit text quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (48 bytes):
///
///  offset  0  dst_min  [f32; 2]   loc 1
///  offset  8  dst_max  [f32; 2]   loc 2
///  offset 16  uv_min   [f32; 2]   loc 3
///  offset 24  uv_max   [f32; 2]   loc 4
///  offset 32  color    [f32; 4]   loc 5
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: [f32; 4],
}

impl GlyphInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2, // dst_min
        2 => Float32x2, // dst_max
        3 => Float32x2, // uv_min
        4 => Float32x2, // uv_max
        5 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packer_fills_rows_then_wraps() {
        let mut p = ShelfPacker::new(32);
        assert_eq!(p.allocate(10, 5), Some((1, 1)));
        assert_eq!(p.allocate(10, 8), Some((12, 1)));
        // 23 + 10 + 1 > 32: next shelf below the tallest glyph of the row.
        assert_eq!(p.allocate(10, 4), Some((1, 10)));
    }

    #[test]
    fn packer_reports_full_and_stays_full() {
        let mut p = ShelfPacker::new(16);
        assert_eq!(p.allocate(20, 2), None);
        assert_eq!(p.allocate(1, 1), None);
    }
}
