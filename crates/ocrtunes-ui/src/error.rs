use thiserror::Error;

use crate::scene::SceneId;

/// Construction-time errors. These indicate a programming mistake in how a
/// widget was configured, not a runtime condition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("widget size must be positive and finite, got {width}x{height}")]
    InvalidSize { width: f32, height: f32 },

    #[error("max_visible must be at least 1")]
    ZeroVisible,

    #[error("a grid needs at least one column")]
    ZeroColumns,

    #[error("dropdown option {0:?} is listed twice")]
    DuplicateOption(String),

    #[error("dropdown has no options and no placeholder")]
    NoOptions,

    #[error("selected value {0:?} is neither an option nor the placeholder")]
    UnknownSelection(String),

    #[error("malformed song length {0:?}, expected M:SS")]
    BadSongLength(String),
}

/// Errors raised while resolving scene transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("no scene registered as {0}")]
    UnknownScene(SceneId),
}
