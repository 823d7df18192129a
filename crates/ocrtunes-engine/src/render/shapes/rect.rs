use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::render::RenderCtx;
use crate::scene::shapes::RectCmd;

use super::common::{InstanceBuffer, QuadBuffers, ViewportBindings, instanced_pipeline, write_viewport_ubo};

const LABEL: &str = "ocrtunes rect";

/// Renderer for `DrawCmd::Rect`: one instance per solid rectangle.
pub(crate) struct RectRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bindings: Option<ViewportBindings>,
    quad: Option<QuadBuffers>,
    instances: InstanceBuffer<RectInstance>,
}

impl Default for RectRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bindings: None,
            quad: None,
            instances: InstanceBuffer::new("ocrtunes rect instance vbo"),
        }
    }
}

impl RectRenderer {
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

    /// Stages `cmd`. Empty, non-finite and fully transparent rects stage nothing.
    pub(crate) fn push(&mut self, cmd: &RectCmd) -> Range<u32> {
        let Some(instance) = RectInstance::from_cmd(cmd) else {
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
            include_str!("shaders/rect.wgsl"),
            &bindings.layout,
            RectInstance::layout(),
        );
        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bindings = Some(bindings);
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct RectInstance {
    origin: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
}

impl RectInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // size
        3 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RectInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }

    fn from_cmd(cmd: &RectCmd) -> Option<Self> {
        let r = cmd.rect.normalized();
        if r.is_empty() || !r.is_finite() || !cmd.color.is_finite() || cmd.color.a <= 0.0 {
            return None;
        }
        let c = cmd.color.clamped();
        Some(Self {
            origin: [r.origin.x, r.origin.y],
            size: [r.size.x, r.size.y],
            color: [c.r, c.g, c.b, c.a],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;
    use crate::paint::Color;

    fn cmd(rect: Rect, color: Color) -> RectCmd {
        RectCmd { rect, color }
    }

    // ── staging ───────────────────────────────────────────────────────────

    #[test]
    fn negative_sizes_are_normalized() {
        let i = RectInstance::from_cmd(&cmd(Rect::new(10.0, 10.0, -4.0, 2.0), Color::rgb8(255, 0, 0)))
            .unwrap();
        assert_eq!(i.origin, [6.0, 10.0]);
        assert_eq!(i.size, [4.0, 2.0]);
        assert_eq!(i.color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn invisible_rects_stage_nothing() {
        let mut r = RectRenderer::new();
        let black = Color::rgb8(0, 0, 0);
        assert!(r.push(&cmd(Rect::new(0.0, 0.0, 0.0, 5.0), black)).is_empty());
        assert!(r.push(&cmd(Rect::new(f32::NAN, 0.0, 5.0, 5.0), black)).is_empty());
        assert!(r.push(&cmd(Rect::new(0.0, 0.0, 5.0, 5.0), Color::transparent())).is_empty());
        assert_eq!(r.push(&cmd(Rect::new(0.0, 0.0, 5.0, 5.0), black)), 0..1);
        assert_eq!(r.push(&cmd(Rect::new(1.0, 0.0, 5.0, 5.0), black)), 1..2);
    }
}
