use crate::coords::Rect;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

use super::Border;

/// Rounded rectangle draw payload with a uniform corner radius.
///
/// Negative radii are treated as zero; radii larger than half the shorter side
/// are clamped by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundedRectCmd {
    pub rect: Rect,
    pub radius: f32,
    pub color: Color,
    pub border: Option<Border>,
}

impl RoundedRectCmd {
    #[inline]
    pub fn new(rect: Rect, radius: f32, color: Color, border: Option<Border>) -> Self {
        Self { rect, radius, color, border }
    }
}

impl DrawList {
    /// Records a rounded rectangle draw command.
    #[inline]
    pub fn push_rounded_rect(
        &mut self,
        z: ZIndex,
        rect: Rect,
        radius: f32,
        color: Color,
        border: Option<Border>,
    ) {
        self.push(z, DrawCmd::RoundedRect(RoundedRectCmd::new(rect, radius, color, border)));
    }

    /// Records an unfilled rectangle outline.
    #[inline]
    pub fn push_outline(&mut self, z: ZIndex, rect: Rect, border: Border) {
        self.push_rounded_rect(z, rect, 0.0, Color::transparent(), Some(border));
    }
}
