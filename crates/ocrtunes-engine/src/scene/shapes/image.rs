use crate::coords::Rect;
use crate::images::ImageId;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Image blit payload. The image is scaled to fill `rect`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCmd {
    pub image: ImageId,
    pub rect: Rect,
    /// Multiplier applied to the image alpha, `0.0..=1.0`.
    pub opacity: f32,
}

impl DrawList {
    /// Records an image draw command.
    #[inline]
    pub fn push_image(&mut self, z: ZIndex, image: ImageId, rect: Rect, opacity: f32) {
        self.push(z, DrawCmd::Image(ImageCmd { image, rect, opacity }));
    }
}
