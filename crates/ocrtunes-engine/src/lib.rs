//! OCRtunes engine crate.
//!
//! Owns the platform + GPU runtime pieces, the instanced shape renderers and
//! the renderer-agnostic draw stream used by the widget layer.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;
pub mod text;
pub mod images;
