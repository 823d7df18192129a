//! OCRtunes UI: retained widgets, scenes and navigation on top of
//! `ocrtunes-engine`.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use ocrtunes_ui::prelude::*;
//!
//! struct Menu {
//!     core: SceneCore,
//!     play: WidgetKey<Button>,
//! }
//!
//! impl Scene for Menu {
//!     fn core(&self) -> &SceneCore { &self.core }
//!     fn core_mut(&mut self) -> &mut SceneCore { &mut self.core }
//! }
//!
//! Application::new()
//!     .title("OCRtunes")
//!     .font("regular", regular_bytes)
//!     .run(|assets| Ok(Navigator::new(build_menu(assets)?)))?;
//! ```
//!
//! Widgets are built from a [`WidgetConfig`] and a [`style::Style`], owned
//! by a scene's [`scene::WidgetSet`] and addressed through typed
//! [`scene::WidgetKey`]s. The [`Navigator`] routes input to the current
//! scene and swaps scenes when one requests it.

pub mod animation;
pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod layout;
pub mod model;
pub mod navigator;
pub mod painter;
pub mod scene;
pub mod style;
pub mod widget;
pub mod widgets;

#[cfg(test)]
mod testing;

pub use app::{Application, Assets, FontMap};
pub use config::WidgetConfig;
pub use error::{BuildError, NavError};
pub use navigator::Navigator;

/// Everything a scene implementation needs.
pub mod prelude {
    pub use crate::animation::{ModalAnimation, Tween};
    pub use crate::app::{Application, Assets, FontMap};
    pub use crate::config::WidgetConfig;
    pub use crate::error::{BuildError, NavError};
    pub use crate::event::{EventCtx, UiEvent};
    pub use crate::model::{ListEntry, PlaylistRecord, Searchable, Song, SongLength};
    pub use crate::navigator::{Navigator, Recipient, SceneCtx, SceneMessage};
    pub use crate::painter::Painter;
    pub use crate::scene::{Popup, Scene, SceneCore, SceneId, WidgetKey, WidgetSet};
    pub use crate::style::{self, Style, BODY_SIZE};
    pub use crate::widget::{Clickable, Editable, LayoutCtx, Scrollable, Widget};
    pub use crate::widgets::{
        Button, Checkboxes, DropDown, GridSlide, ListStyle, Panel, PlaylistCard, ScrollArea,
        ScrollTrack, ScrollableList, SearchOverlay, TextField,
    };

    pub use ocrtunes_engine::coords::{Rect, Vec2};
    pub use ocrtunes_engine::images::{ImageId, ImageStore};
    pub use ocrtunes_engine::input::{Key, MouseButton};
    pub use ocrtunes_engine::paint::Color;
    pub use ocrtunes_engine::text::FontId;
}
