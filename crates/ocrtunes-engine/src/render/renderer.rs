use std::ops::Range;

use crate::images::{ImageId, ImageStore};
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};
use crate::text::FontSystem;

use super::shapes::image::ImageRenderer;
use super::shapes::rect::RectRenderer;
use super::shapes::rounded_rect::RoundedRectRenderer;
use super::shapes::text::TextRenderer;

/// Which shape renderer (and, for images, which texture) a batch uses.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum BatchKind {
    Rect,
    RoundedRect,
    Text,
    Image(ImageId),
}

/// A run of consecutive instances drawn with one call.
#[derive(Debug, Clone, PartialEq)]
struct Batch {
    kind: BatchKind,
    instances: Range<u32>,
}

/// Appends `instances` to the last batch when it continues it, else opens a
/// new batch. Empty ranges are dropped.
fn extend_batches(batches: &mut Vec<Batch>, kind: BatchKind, instances: Range<u32>) {
    if instances.is_empty() {
        return;
    }
    if let Some(last) = batches.last_mut()
        && last.kind == kind
        && last.instances.end == instances.start
    {
        last.instances.end = instances.end;
        return;
    }
    batches.push(Batch { kind, instances });
}

/// Draws a [`DrawList`] in paint order with the instanced shape renderers.
///
/// All commands are staged first, then drawn in one render pass that loads
/// the existing target contents. GPU objects are created on first use and
/// kept across frames.
pub struct Renderer {
    rects: RectRenderer,
    rounded_rects: RoundedRectRenderer,
    text: TextRenderer,
    images: ImageRenderer,
    batches: Vec<Batch>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            rects: RectRenderer::new(),
            rounded_rects: RoundedRectRenderer::new(),
            text: TextRenderer::new(),
            images: ImageRenderer::new(),
            batches: Vec::new(),
        }
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        fonts: &FontSystem,
        images: &ImageStore,
    ) {
        self.rects.begin(ctx);
        self.rounded_rects.begin(ctx);
        self.text.begin(ctx);
        self.images.begin(ctx);
        self.batches.clear();

        for item in draw_list.iter_in_paint_order() {
            let (kind, instances) = match &item.cmd {
                DrawCmd::Rect(cmd) => (BatchKind::Rect, self.rects.push(cmd)),
                DrawCmd::RoundedRect(cmd) => (BatchKind::RoundedRect, self.rounded_rects.push(cmd)),
                DrawCmd::Text(cmd) => (BatchKind::Text, self.text.push(ctx, cmd, fonts)),
                DrawCmd::Image(cmd) => (BatchKind::Image(cmd.image), self.images.push(ctx, cmd, images)),
            };
            extend_batches(&mut self.batches, kind, instances);
        }

        if self.batches.is_empty() {
            return;
        }

        self.rects.finish(ctx);
        self.rounded_rects.finish(ctx);
        self.text.finish(ctx);
        self.images.finish(ctx);

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("ocrtunes scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations { load: wgpu::LoadOp::Load, store: wgpu::StoreOp::Store },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for batch in &self.batches {
            let instances = batch.instances.clone();
            match batch.kind {
                BatchKind::Rect => self.rects.draw(&mut rpass, instances),
                BatchKind::RoundedRect => self.rounded_rects.draw(&mut rpass, instances),
                BatchKind::Text => self.text.draw(&mut rpass, instances),
                BatchKind::Image(id) => self.images.draw(&mut rpass, id, instances),
            }
        }

        log::trace!("drew {} batches", self.batches.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(batches: &[Batch]) -> Vec<(BatchKind, Range<u32>)> {
        batches.iter().map(|b| (b.kind, b.instances.clone())).collect()
    }

    // ── batching ──────────────────────────────────────────────────────────

    #[test]
    fn consecutive_commands_of_one_kind_share_a_batch() {
        let mut b = Vec::new();
        extend_batches(&mut b, BatchKind::Rect, 0..1);
        extend_batches(&mut b, BatchKind::Rect, 1..2);
        extend_batches(&mut b, BatchKind::Text, 0..5);
        extend_batches(&mut b, BatchKind::Text, 5..9);
        assert_eq!(kinds(&b), vec![(BatchKind::Rect, 0..2), (BatchKind::Text, 0..9)]);
    }

    #[test]
    fn interleaved_kinds_keep_paint_order() {
        let mut b = Vec::new();
        extend_batches(&mut b, BatchKind::Rect, 0..1);
        extend_batches(&mut b, BatchKind::Text, 0..3);
        extend_batches(&mut b, BatchKind::Rect, 1..2);
        assert_eq!(
            kinds(&b),
            vec![(BatchKind::Rect, 0..1), (BatchKind::Text, 0..3), (BatchKind::Rect, 1..2)]
        );
    }

    #[test]
    fn different_images_are_separate_batches() {
        let mut b = Vec::new();
        extend_batches(&mut b, BatchKind::Image(ImageId(1)), 0..1);
        extend_batches(&mut b, BatchKind::Image(ImageId(2)), 1..2);
        extend_batches(&mut b, BatchKind::Image(ImageId(2)), 2..3);
        assert_eq!(
            kinds(&b),
            vec![(BatchKind::Image(ImageId(1)), 0..1), (BatchKind::Image(ImageId(2)), 1..3)]
        );
    }

    #[test]
    fn skipped_commands_do_not_split_a_run() {
        let mut b = Vec::new();
        extend_batches(&mut b, BatchKind::RoundedRect, 0..1);
        extend_batches(&mut b, BatchKind::Text, 0..0);
        extend_batches(&mut b, BatchKind::RoundedRect, 1..2);
        assert_eq!(kinds(&b), vec![(BatchKind::RoundedRect, 0..2)]);
    }
}
