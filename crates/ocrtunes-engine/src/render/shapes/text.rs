use std::collections::{HashMap, HashSet};
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::render::RenderCtx;
use crate::scene::shapes::TextCmd;
use crate::text::{FontId, FontSystem};

use super::common::{
    InstanceBuffer, QuadBuffers, create_viewport_ubo, instanced_pipeline, texture_layout_entries,
    viewport_layout_entry, write_viewport_ubo,
};

const LABEL: &str = "ocrtunes text";

// ── atlas constants ────────────────────────────────────────────────────────

const ATLAS_SIZE: u32 = 2048;
const GLYPH_PADDING: u32 = 1; // pixels between glyphs in the atlas

// ── shelf packing ─────────────────────────────────────────────────────────

/// Row-by-row allocator for the glyph atlas.
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
        Self { size, cursor_x: GLYPH_PADDING, cursor_y: GLYPH_PADDING, row_height: 0, full: false }
    }

    fn reset(&mut self) {
        *self = Self::new(self.size);
    }

    /// Top-left of a free `w` × `h` slot, or `None` once the atlas is full.
    fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.full || w + 2 * GLYPH_PADDING > self.size {
            return None;
        }
        if self.cursor_x + w + GLYPH_PADDING > self.size {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }
        if self.cursor_y + h + GLYPH_PADDING > self.size {
            self.full = true;
            return None;
        }
        let slot = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        Some(slot)
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
/// Glyphs are rasterized by fontdue at physical pixel size on first use and
/// cached in a 2048 × 2048 R8Unorm atlas keyed by `GlyphRasterConfig`. When
/// the atlas fills up it is emptied at the start of the next frame and
/// repopulated on demand.
pub(crate) struct TextRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    atlas_texture: Option<wgpu::Texture>,
    packer: ShelfPacker,
    glyph_cache: HashMap<GlyphRasterConfig, CachedGlyph>,

    quad: Option<QuadBuffers>,
    instances: InstanceBuffer<GlyphInstance>,

    layout: Layout<()>,
    warned_fonts: HashSet<FontId>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            viewport_ubo: None,
            atlas_texture: None,
            packer: ShelfPacker::new(ATLAS_SIZE),
            glyph_cache: HashMap::new(),
            quad: None,
            instances: InstanceBuffer::new("ocrtunes text instance vbo"),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
            warned_fonts: HashSet::new(),
        }
    }
}

impl TextRenderer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn begin(&mut self, ctx: &RenderCtx<'_>) {
        self.ensure_pipeline(ctx);
        self.ensure_atlas(ctx);
        if self.quad.is_none() {
            self.quad = Some(QuadBuffers::new(ctx, LABEL));
        }
        if let Some(ubo) = self.viewport_ubo.as_ref() {
            write_viewport_ubo(ctx, ubo);
        }
        if self.packer.full {
            log::debug!("glyph atlas full; starting over");
            self.packer.reset();
            self.glyph_cache.clear();
        }
        self.instances.clear();
    }

    /// Lays out `cmd` on one line and stages one instance per visible glyph.
    pub(crate) fn push(&mut self, ctx: &RenderCtx<'_>, cmd: &TextCmd, fonts: &FontSystem) -> Range<u32> {
        let start = self.instances.len();
        if cmd.text.is_empty() || !(cmd.size.is_finite() && cmd.size > 0.0) || !cmd.origin.is_finite() {
            return start..start;
        }
        if !cmd.color.is_finite() || cmd.color.a <= 0.0 {
            return start..start;
        }
        let Some(font) = fonts.get(cmd.font) else {
            if self.warned_fonts.insert(cmd.font) {
                log::warn!("unknown {:?}; its text is not drawn", cmd.font);
            }
            return start..start;
        };

        let scale = ctx.scale_factor;
        let c = cmd.color.clamped();
        let color = [c.r, c.g, c.b, c.a];

        // Lay out in physical pixels so glyphs land on the pixel grid.
        self.layout.reset(&LayoutSettings {
            x: (cmd.origin.x * scale).round(),
            y: (cmd.origin.y * scale).round(),
            ..LayoutSettings::default()
        });
        self.layout.append(&[font], &TextStyle::new(&cmd.text, cmd.size * scale, 0));

        // Copy positions out so the borrow on `self.layout` ends before
        // glyphs are placed in the atlas.
        let glyphs: Vec<(GlyphRasterConfig, f32, f32, usize, usize)> = self
            .layout
            .glyphs()
            .iter()
            .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
            .map(|g| (g.key, g.x.round(), g.y.round(), g.width, g.height))
            .collect();

        for (key, x, y, w, h) in glyphs {
            if !self.glyph_cache.contains_key(&key) {
                let (metrics, bitmap) = font.rasterize_config(key);
                if metrics.width == 0 || metrics.height == 0 {
                    continue;
                }
                if let Some(entry) = self.upload_glyph(ctx, &bitmap, metrics.width as u32, metrics.height as u32) {
                    self.glyph_cache.insert(key, entry);
                }
            }
            let Some(cached) = self.glyph_cache.get(&key) else { continue; };

            self.instances.push(GlyphInstance {
                dst_min: [x / scale, y / scale],
                dst_max: [(x + w as f32) / scale, (y + h as f32) / scale],
                uv_min: cached.uv_min,
                uv_max: cached.uv_max,
                color,
            });
        }

        start..self.instances.len()
    }

    pub(crate) fn finish(&mut self, ctx: &RenderCtx<'_>) {
        self.instances.upload(ctx);
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, instances: Range<u32>) {
        let Some(pipeline) = self.pipeline.as_ref() else { return; };
        let Some(bind_group) = self.bind_group.as_ref() else { return; };
        let Some(quad) = self.quad.as_ref() else { return; };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        quad.bind(rpass);
        if self.instances.bind(rpass) {
            rpass.draw_indexed(0..6, 0, instances);
        }
    }

    // ── atlas helpers ──────────────────────────────────────────────────────

    fn upload_glyph(&mut self, ctx: &RenderCtx<'_>, bitmap: &[u8], w: u32, h: u32) -> Option<CachedGlyph> {
        let atlas = self.atlas_texture.as_ref()?;
        let Some((gx, gy)) = self.packer.place(w, h) else {
            if self.packer.full {
                log::warn!("glyph atlas is full ({ATLAS_SIZE}×{ATLAS_SIZE}); some glyphs are skipped this frame");
            }
            return None;
        };

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: atlas,
                mip_level: 0,
                origin: wgpu::Origin3d { x: gx, y: gy, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            bitmap,
            wgpu::TexelCopyBufferLayout { offset: 0, bytes_per_row: Some(w), rows_per_image: Some(h) },
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

        let [texture_entry, sampler_entry] = texture_layout_entries();
        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ocrtunes text bgl"),
            entries: &[viewport_layout_entry(), texture_entry, sampler_entry],
        });
        let pipeline = instanced_pipeline(ctx, LABEL, include_str!("shaders/text.wgsl"), &bgl, GlyphInstance::layout());

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_atlas(&mut self, ctx: &RenderCtx<'_>) {
        if self.atlas_texture.is_none() {
            self.atlas_texture = Some(ctx.device.create_texture(&wgpu::TextureDescriptor {
                label: Some("ocrtunes text atlas"),
                size: wgpu::Extent3d { width: ATLAS_SIZE, height: ATLAS_SIZE, depth_or_array_layers: 1 },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::R8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            }));
            self.packer.reset();
            self.glyph_cache.clear();
            self.bind_group = None;
        }
        if self.bind_group.is_some() {
            return;
        }

        let Some(bgl) = self.bind_group_layout.as_ref() else { return; };
        let Some(atlas) = self.atlas_texture.as_ref() else { return; };

        let view = atlas.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("ocrtunes text sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });
        let viewport_ubo = create_viewport_ubo(ctx, "ocrtunes text viewport ubo");

        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ocrtunes text bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: viewport_ubo.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(&view) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::Sampler(&sampler) },
            ],
        }));
        self.viewport_ubo = Some(viewport_ubo);
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

    // ── shelf packing ─────────────────────────────────────────────────────

    #[test]
    fn glyphs_fill_a_row_then_wrap() {
        let mut p = ShelfPacker::new(32);
        assert_eq!(p.place(10, 6), Some((1, 1)));
        assert_eq!(p.place(10, 8), Some((12, 1)));
        // 23 + 10 + 1 > 32: next shelf starts below the tallest glyph.
        assert_eq!(p.place(10, 4), Some((1, 10)));
    }

    #[test]
    fn packer_reports_full_and_resets() {
        let mut p = ShelfPacker::new(16);
        assert_eq!(p.place(14, 14), Some((1, 1)));
        assert_eq!(p.place(4, 4), None);
        assert!(p.full);
        assert_eq!(p.place(1, 1), None);

        p.reset();
        assert!(!p.full);
        assert_eq!(p.place(4, 4), Some((1, 1)));
    }

    #[test]
    fn glyph_wider_than_the_atlas_is_refused_without_filling_it() {
        let mut p = ShelfPacker::new(16);
        assert_eq!(p.place(20, 2), None);
        assert!(!p.full);
        assert_eq!(p.place(2, 2), Some((1, 1)));
    }
}
