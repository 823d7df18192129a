//! The contract between the runtime loop and the widget layer.

mod frame;

pub use frame::FrameCtx;

/// What the runtime should do after a callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Implemented by the layer that owns the scenes.
///
/// The runtime calls [`App::on_frame`] once per paced redraw with the input
/// that arrived since the previous one.
pub trait App {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
