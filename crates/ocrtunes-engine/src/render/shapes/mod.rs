//! Instanced shape renderers, one per `DrawCmd` kind.
//!
//! Each renderer follows the same frame protocol, driven by
//! [`Renderer`](super::Renderer):
//! - `begin`: lazily create GPU objects, reset staged instances
//! - `push`: stage one command, returning the instance range it occupies
//! - `finish`: upload staged instances
//! - `draw`: issue one instanced draw for a range inside an open pass

mod common;

pub(crate) mod image;
pub(crate) mod rect;
pub(crate) mod rounded_rect;
pub(crate) mod text;
