use std::collections::HashMap;
use std::ops::Range;

use ::image::RgbaImage;
use ::image::imageops::{self, FilterType};
use bytemuck::{Pod, Zeroable};

use crate::images::{ImageId, ImageStore};
use crate::render::RenderCtx;
use crate::scene::shapes::ImageCmd;

use super::common::{
    InstanceBuffer, QuadBuffers, create_viewport_ubo, instanced_pipeline, texture_layout_entries,
    viewport_layout_entry, write_viewport_ubo,
};

const LABEL: &str = "ocrtunes image";

// ── mip chain ─────────────────────────────────────────────────────────────

/// Scales `(w, h)` down to fit `max` on both axes, keeping the aspect ratio.
fn fit_within(w: u32, h: u32, max: u32) -> (u32, u32) {
    let longest = w.max(h);
    if longest <= max {
        return (w.max(1), h.max(1));
    }
    let scale = max as f64 / longest as f64;
    let fit = |v: u32| ((v as f64 * scale).round() as u32).clamp(1, max);
    (fit(w), fit(h))
}

/// Sizes of every mip level from `(w, h)` down to 1 × 1.
fn mip_sizes(w: u32, h: u32) -> Vec<(u32, u32)> {
    let mut sizes = vec![(w.max(1), h.max(1))];
    while let Some(&(w, h)) = sizes.last() {
        if w == 1 && h == 1 {
            break;
        }
        sizes.push(((w / 2).max(1), (h / 2).max(1)));
    }
    sizes
}

/// Uploaded texture plus the bind group that samples it.
struct GpuImage {
    bind_group: wgpu::BindGroup,
    _texture: wgpu::Texture,
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Renderer for `DrawCmd::Image`.
///
/// Each `ImageId` is uploaded once, with a CPU-built mip chain so covers
/// scaled far below their natural size stay smooth. Images in an
/// [`ImageStore`] never change, so the cache is never invalidated.
pub(crate) struct ImageRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    viewport_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    textures: HashMap<ImageId, GpuImage>,

    quad: Option<QuadBuffers>,
    instances: InstanceBuffer<ImageInstance>,
}

impl Default for ImageRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            viewport_ubo: None,
            sampler: None,
            textures: HashMap::new(),
            quad: None,
            instances: InstanceBuffer::new("ocrtunes image instance vbo"),
        }
    }
}

impl ImageRenderer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn begin(&mut self, ctx: &RenderCtx<'_>) {
        self.ensure_pipeline(ctx);
        if self.quad.is_none() {
            self.quad = Some(QuadBuffers::new(ctx, LABEL));
        }
        if let Some(ubo) = self.viewport_ubo.as_ref() {
            write_viewport_ubo(ctx, ubo);
        }
        self.instances.clear();
    }

    /// Stages `cmd`, uploading its image the first time it is drawn.
    pub(crate) fn push(&mut self, ctx: &RenderCtx<'_>, cmd: &ImageCmd, images: &ImageStore) -> Range<u32> {
        let end = self.instances.len();
        let r = cmd.rect.normalized();
        let opacity = if cmd.opacity.is_finite() { cmd.opacity.clamp(0.0, 1.0) } else { 0.0 };
        if r.is_empty() || !r.is_finite() || opacity <= 0.0 {
            return end..end;
        }
        if !self.textures.contains_key(&cmd.image) {
            let Some(gpu) = self.upload(ctx, images.get(cmd.image)) else { return end..end; };
            self.textures.insert(cmd.image, gpu);
        }

        let i = self.instances.push(ImageInstance {
            dst_min: [r.x(), r.y()],
            dst_max: [r.right(), r.bottom()],
            opacity,
        });
        i..i + 1
    }

    pub(crate) fn finish(&mut self, ctx: &RenderCtx<'_>) {
        self.instances.upload(ctx);
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, image: ImageId, instances: Range<u32>) {
        let Some(pipeline) = self.pipeline.as_ref() else { return; };
        let Some(gpu) = self.textures.get(&image) else { return; };
        let Some(quad) = self.quad.as_ref() else { return; };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &gpu.bind_group, &[]);
        quad.bind(rpass);
        if self.instances.bind(rpass) {
            rpass.draw_indexed(0..6, 0, instances);
        }
    }

    fn upload(&self, ctx: &RenderCtx<'_>, image: &RgbaImage) -> Option<GpuImage> {
        let bgl = self.bind_group_layout.as_ref()?;
        let ubo = self.viewport_ubo.as_ref()?;
        let sampler = self.sampler.as_ref()?;
        if image.width() == 0 || image.height() == 0 {
            return None;
        }

        let max = ctx.device.limits().max_texture_dimension_2d;
        let (w, h) = fit_within(image.width(), image.height(), max);
        let base = if (w, h) == image.dimensions() {
            image.clone()
        } else {
            log::debug!("image {}×{} exceeds {max}px; scaled to {w}×{h}", image.width(), image.height());
            imageops::resize(image, w, h, FilterType::Triangle)
        };
        let sizes = mip_sizes(w, h);

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("ocrtunes image texture"),
            size: wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
            mip_level_count: sizes.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (level, &(lw, lh)) in sizes.iter().enumerate() {
            let resized;
            let pixels = if level == 0 {
                &base
            } else {
                resized = imageops::resize(&base, lw, lh, FilterType::Triangle);
                &resized
            };
            ctx.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                pixels.as_raw(),
                wgpu::TexelCopyBufferLayout { offset: 0, bytes_per_row: Some(4 * lw), rows_per_image: Some(lh) },
                wgpu::Extent3d { width: lw, height: lh, depth_or_array_layers: 1 },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ocrtunes image bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: ubo.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(&view) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::Sampler(sampler) },
            ],
        });
        Some(GpuImage { bind_group, _texture: texture })
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let [texture_entry, sampler_entry] = texture_layout_entries();
        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ocrtunes image bgl"),
            entries: &[viewport_layout_entry(), texture_entry, sampler_entry],
        });
        let pipeline = instanced_pipeline(ctx, LABEL, include_str!("shaders/image.wgsl"), &bgl, ImageInstance::layout());

        // Bind groups reference the old layout; textures are re-uploaded lazily.
        self.textures.clear();
        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);
        self.viewport_ubo = Some(create_viewport_ubo(ctx, "ocrtunes image viewport ubo"));
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("ocrtunes image sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        }));
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ImageInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
    opacity: f32,
}

impl ImageInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        1 => Float32x2, // dst_min
        2 => Float32x2, // dst_max
        3 => Float32    // opacity
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ImageInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── sizing ────────────────────────────────────────────────────────────

    #[test]
    fn small_images_keep_their_size() {
        assert_eq!(fit_within(300, 200, 8192), (300, 200));
    }

    #[test]
    fn oversized_images_keep_their_aspect() {
        assert_eq!(fit_within(16384, 4096, 8192), (8192, 2048));
        assert_eq!(fit_within(100, 10_000, 1000), (10, 1000));
        assert_eq!(fit_within(20_000, 1, 1000), (1000, 1));
    }

    #[test]
    fn mip_chain_halves_down_to_one_pixel() {
        assert_eq!(mip_sizes(8, 2), vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
        assert_eq!(mip_sizes(1, 1), vec![(1, 1)]);
        assert_eq!(mip_sizes(640, 640).len(), 10);
    }
}
