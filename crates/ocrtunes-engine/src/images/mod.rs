//! Decoded image storage with placeholder fallback.

mod store;

pub use store::{ImageId, ImageStore};
