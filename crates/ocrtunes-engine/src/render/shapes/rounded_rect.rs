use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::paint::Color;
use crate::render::RenderCtx;
use crate::scene::shapes::RoundedRectCmd;

use super::common::{InstanceBuffer, QuadBuffers, ViewportBindings, instanced_pipeline, write_viewport_ubo};

const LABEL: &str = "ocrtunes rounded_rect";

/// Renderer for `DrawCmd::RoundedRect`.
///
/// Coverage comes from a signed distance to the rounded box, so edges are
/// anti-aliased at any scale. Borders are an inner ring composited over the
/// fill; radius and border width are clamped to half the shorter side.
pub(crate) struct RoundedRectRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bindings: Option<ViewportBindings>,
    quad: Option<QuadBuffers>,
    instances: InstanceBuffer<RoundedRectInstance>,
}

impl Default for RoundedRectRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bindings: None,
            quad: None,
            instances: InstanceBuffer::new("ocrtunes rounded_rect instance vbo"),
        }
    }
}

impl RoundedRectRenderer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn begin(&mut self, ctx: &RenderCtx<'_>) {
        self.ensure_pipeline(ctx);
        if self.quad.is_none() {
            self.quad = Some(QuadBuffers::new(ctx, LABEL));
        }
        if let Some(bindings) = self.bindings.as_ref() {
            write_viewport_ubo(ctx, &bindings.ubo);
        }
        self.instances.clear();
    }

    pub(crate) fn push(&mut self, cmd: &RoundedRectCmd) -> Range<u32> {
        let Some(instance) = RoundedRectInstance::from_cmd(cmd) else {
            let end = self.instances.len();
            return end..end;
        };
        let i = self.instances.push(instance);
        i..i + 1
    }

    pub(crate) fn finish(&mut self, ctx: &RenderCtx<'_>) {
        self.instances.upload(ctx);
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, instances: Range<u32>) {
        let Some(pipeline) = self.pipeline.as_ref() else { return; };
        let Some(bindings) = self.bindings.as_ref() else { return; };
        let Some(quad) = self.quad.as_ref() else { return; };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &bindings.group, &[]);
        quad.bind(rpass);
        if self.instances.bind(rpass) {
            rpass.draw_indexed(0..6, 0, instances);
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }
        let bindings = ViewportBindings::new(ctx, LABEL);
        let pipeline = instanced_pipeline(
            ctx,
            LABEL,
            include_str!("shaders/rounded_rect.wgsl"),
            &bindings.layout,
            RoundedRectInstance::layout(),
        );
        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bindings = Some(bindings);
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (56 bytes):
///
///  offset  0  origin        [f32; 2]   loc 1
///  offset  8  size          [f32; 2]   loc 2
///  offset 16  color         [f32; 4]   loc 3
///  offset 32  border_color  [f32; 4]   loc 4
///  offset 48  params        [f32; 2]   loc 5  (radius, border width)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct RoundedRectInstance {
    origin: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
    border_color: [f32; 4],
    params: [f32; 2],
}

impl RoundedRectInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // size
        3 => Float32x4, // color
        4 => Float32x4, // border_color
        5 => Float32x2  // params
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RoundedRectInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }

    fn from_cmd(cmd: &RoundedRectCmd) -> Option<Self> {
        let r = cmd.rect.normalized();
        if r.is_empty() || !r.is_finite() {
            return None;
        }

        let fill = visible(cmd.color);
        let (border_width, border_color) = match &cmd.border {
            Some(b) if b.width.is_finite() && b.width > 0.0 => match visible(b.color) {
                Some(c) => (b.width, c),
                None => (0.0, Color::transparent()),
            },
            _ => (0.0, Color::transparent()),
        };
        if fill.is_none() && border_width == 0.0 {
            return None;
        }

        let fill = fill.unwrap_or(Color::transparent());
        let radius = if cmd.radius.is_finite() { cmd.radius.max(0.0) } else { 0.0 };
        Some(Self {
            origin: [r.origin.x, r.origin.y],
            size: [r.size.x, r.size.y],
            color: [fill.r, fill.g, fill.b, fill.a],
            border_color: [border_color.r, border_color.g, border_color.b, border_color.a],
            params: [radius, border_width],
        })
    }
}

fn visible(c: Color) -> Option<Color> {
    (c.is_finite() && c.a > 0.0).then(|| c.clamped())
}
