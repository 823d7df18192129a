//! GPU rendering subsystem.
//!
//! [`Renderer`] walks a `DrawList` in paint order and hands each command to
//! the instanced renderer for its shape. Consecutive commands of one kind
//! share a draw call, so the z order of the list is kept exactly.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down)
//! - vertex shaders convert to NDC using a viewport uniform

mod ctx;
mod renderer;
mod shapes;

pub use ctx::{RenderCtx, RenderTarget};
pub use renderer::Renderer;
