//! The application's screens and the resources they share.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use anyhow::Result;
use ocrtunes_ui::prelude::*;

use crate::store::{Store, StoreError};

mod library;
mod main_menu;
mod playlist_maker;
mod playlist_viewer;
mod tutorial;

pub use library::Library;
pub use main_menu::MainMenu;
pub use playlist_maker::PlaylistMaker;
pub use playlist_viewer::PlaylistViewer;
pub use tutorial::Tutorial;

pub const MAIN_MENU: SceneId = SceneId::new("main_menu");
pub const TUTORIAL: SceneId = SceneId::new("tutorial");
pub const LIBRARY: SceneId = SceneId::new("library");
pub const PLAYLIST_MAKER: SceneId = SceneId::new("playlist_maker");
pub const PLAYLIST_VIEWER: SceneId = SceneId::new("playlist_viewer");

/// Cover stored with new playlists, relative to the data directory.
pub const DEFAULT_COVER: &str = "images/default.png";

/// Requests other screens send to the playlist maker.
#[derive(Debug, Clone)]
pub enum MakerRequest {
    /// Start a fresh playlist.
    Reset,
    /// Start a fresh playlist with only this genre's songs on offer.
    Genre(String),
    /// Append a song to the playlist in progress.
    Add(Song),
}

// ── shared resources ──────────────────────────────────────────────────────

pub struct Images {
    pub default_cover: ImageId,
    pub cross: ImageId,
    pub bin: ImageId,
    pub tick: ImageId,
    pub particles: [ImageId; 4],
    pub menu_bg: ImageId,
    pub library_bg: ImageId,
    pub maker_bg: ImageId,
    pub viewer_bg: ImageId,
    /// Playlist covers keyed by their stored path.
    pub covers: HashMap<String, ImageId>,
}

impl Images {
    /// Loads the fixed artwork plus every cover in `covers`. Unreadable files
    /// fall back to the store's placeholder.
    pub fn load<'a>(store: &mut ImageStore, dir: &Path, covers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut load = |rel: &str| store.load(dir.join(rel));
        let covers = covers.into_iter().map(|c| (c.to_owned(), load(c))).collect();
        Self {
            covers,
            default_cover: load(DEFAULT_COVER),
            cross: load("images/cross.png"),
            bin: load("images/bin.png"),
            tick: load("images/tick.png"),
            particles: [
                load("particles/particle1.png"),
                load("particles/particle2.png"),
                load("particles/particle3.png"),
                load("particles/particle4.png"),
            ],
            menu_bg: load("backgrounds/main_menu.png"),
            library_bg: load("backgrounds/library.png"),
            maker_bg: load("backgrounds/playlists.png"),
            viewer_bg: load("backgrounds/playlist_viewer.png"),
        }
    }

    /// Cover for a playlist's stored image path.
    pub fn cover(&self, path: &str) -> ImageId {
        self.covers.get(path).copied().unwrap_or(self.default_cover)
    }
}

/// Everything a screen is built from. Cheap to clone.
#[derive(Clone)]
pub struct Env {
    pub store: Rc<RefCell<Store>>,
    pub catalogue: Rc<[Song]>,
    pub images: Rc<Images>,
    pub regular: Option<FontId>,
    pub bold: Option<FontId>,
}

impl Env {
    /// Default widget style in the bold face.
    pub fn style(&self, size: f32) -> Style {
        Style::default().font(self.bold, size)
    }

    /// Style for text drawn straight onto the scene background.
    pub fn plain(&self, size: f32) -> Style {
        self.style(size).text(style::BLACK)
    }

    /// Red message line.
    pub fn error_style(&self, size: f32) -> Style {
        self.style(size).text(style::RED)
    }
}

/// Builds every screen and starts on the main menu.
pub fn build(env: &Env) -> Result<Navigator> {
    Ok(Navigator::new(MainMenu::new(env)?)
        .with(Tutorial::new(env)?)
        .with(Library::new(env)?)
        .with(PlaylistMaker::new(env)?)
        .with(PlaylistViewer::new(env)?))
}

// ── widget helpers ────────────────────────────────────────────────────────

/// Read-only line of text without a background.
pub fn label(x: f32, y: f32, w: f32, h: f32, text: &str, style: Style) -> Result<TextField, BuildError> {
    TextField::new(&WidgetConfig::new(x, y, w, h).text(text).background(false), style)
}

/// Logs store failures that are not user mistakes and returns the text to show.
pub fn store_failure(e: &StoreError) -> String {
    log::error!("store update failed: {e}");
    e.to_string()
}

/// The navigation column on the left of the signed-in screens.
pub struct Sidebar {
    pub first: WidgetKey<Button>,
}

impl Sidebar {
    /// `first` and `second` are `(label, target)` for the two top entries.
    /// Settings is shown but goes nowhere.
    pub fn add(
        widgets: &mut WidgetSet,
        env: &Env,
        first: (&str, SceneId),
        second: (&str, SceneId),
    ) -> Result<Self, BuildError> {
        let entry = |y: f32, text: &str, to: Option<SceneId>| {
            let mut cfg = WidgetConfig::new(0.0, y, 200.0, 50.0).text(text).background(false);
            if let Some(to) = to {
                cfg = cfg.redirect(to);
            }
            Button::new(&cfg, env.plain(BODY_SIZE))
        };
        let first = widgets.add(entry(188.0, first.0, Some(first.1))?);
        widgets.add(entry(238.0, second.0, Some(second.1))?);
        widgets.add(entry(783.0, "Settings", None)?);
        widgets.add(entry(833.0, "Log Out", Some(MAIN_MENU))?);
        Ok(Self { first })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use ocrtunes_engine::text::FontSystem;
    use ocrtunes_ui::model::SongLength;

    /// An environment over a temporary data directory and a small catalogue.
    pub fn env() -> (tempfile::TempDir, Env) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let song = |name: &str, artist: &str, genre: &str, m, s| Song {
            name: name.into(),
            artist: artist.into(),
            genre: genre.into(),
            length: SongLength::new(m, s),
        };
        let catalogue: Vec<Song> = vec![
            song("505", "Arctic Monkeys", "Rock", 4, 13),
            song("Breathe", "Yeat", "Rap", 2, 51),
            song("Kill Bill", "SZA", "Pop", 2, 36),
            song("Nights", "Frank Ocean", "RNB", 5, 7),
        ];
        let p = ImageStore::placeholder();
        let images = Images {
            default_cover: p,
            cross: p,
            bin: p,
            tick: p,
            particles: [p; 4],
            menu_bg: p,
            library_bg: p,
            maker_bg: p,
            viewer_bg: p,
            covers: HashMap::new(),
        };
        let env = Env {
            store: Rc::new(RefCell::new(store)),
            catalogue: catalogue.into(),
            images: Rc::new(images),
            regular: None,
            bold: None,
        };
        (dir, env)
    }

    pub const USER: &str = "sparky";

    /// Registers [`USER`] and logs in through the main menu, landing on the library.
    pub fn signed_in(env: &Env) -> Navigator {
        env.store.borrow_mut().sign_up(USER, "pw").unwrap();
        let mut nav = build(env).unwrap();
        let mut events = fill(1160.0, 340.0, USER);
        events.extend(fill(1160.0, 400.0, "pw"));
        events.push(press(1160.0, 560.0));
        frame(&mut nav, &events);
        assert_eq!(nav.current_id(), &LIBRARY);
        nav
    }

    /// Runs one frame headlessly: input, update, then messages and transitions.
    pub fn frame(nav: &mut Navigator, events: &[UiEvent]) {
        let fonts = FontSystem::new();
        nav.process_input(events);
        nav.update(&LayoutCtx::new(&fonts, None, 1.0 / 60.0));
        nav.finish_frame();
    }

    pub fn press(x: f32, y: f32) -> UiEvent {
        UiEvent::PointerDown { pos: Vec2::new(x, y), button: MouseButton::Left }
    }

    pub fn key(k: Key) -> UiEvent {
        UiEvent::KeyDown { key: k, modifiers: Default::default(), text: None }
    }

    pub fn type_text(text: &str) -> Vec<UiEvent> {
        text.chars()
            .map(|c| UiEvent::KeyDown { key: Key::Character(c), modifiers: Default::default(), text: Some(c.to_string()) })
            .collect()
    }

    /// Clicks into a field, types `text` and confirms with Enter.
    pub fn fill(x: f32, y: f32, text: &str) -> Vec<UiEvent> {
        let mut events = vec![press(x, y)];
        events.extend(type_text(text));
        events.push(key(Key::Enter));
        events
    }
}
