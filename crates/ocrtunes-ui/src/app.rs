use std::collections::HashMap;

use anyhow::Result;
use winit::dpi::LogicalSize;

use ocrtunes_engine::core::{App as EngineApp, AppControl, FrameCtx};
use ocrtunes_engine::device::GpuInit;
use ocrtunes_engine::images::ImageStore;
use ocrtunes_engine::render::Renderer;
use ocrtunes_engine::scene::DrawList;
use ocrtunes_engine::text::{FontId, FontSystem};
use ocrtunes_engine::window::{Runtime, RuntimeConfig};

use crate::event::UiEvent;
use crate::navigator::Navigator;
use crate::painter::Painter;
use crate::style::WHITE;
use crate::widget::LayoutCtx;

// ── FontMap ───────────────────────────────────────────────────────────────

/// Loaded fonts by registration name.
pub struct FontMap(pub(crate) HashMap<String, FontId>);

impl FontMap {
    /// `None` if `name` was never registered or failed to load.
    pub fn get(&self, name: &str) -> Option<FontId> {
        self.0.get(name).copied()
    }
}

/// Resources available while the scenes are built.
pub struct Assets<'a> {
    pub fonts: &'a FontMap,
    pub images: &'a mut ImageStore,
}

// ── Application ───────────────────────────────────────────────────────────

/// Window + frame loop driver.
///
/// ```rust,ignore
/// Application::new()
///     .title("OCRtunes")
///     .size(1400.0, 900.0)
///     .font("regular", regular_bytes)
///     .font("bold", bold_bytes)
///     .run(|assets| build_scenes(assets))?;
/// ```
///
/// Each frame: translate input, `process_input`, `update`, `render` into a
/// draw list, draw it on the GPU, then let the navigator deliver messages and
/// swap scenes. The loop ends when the window is closed.
pub struct Application {
    title: String,
    width: f64,
    height: f64,
    target_fps: u32,
    fonts: Vec<(String, Vec<u8>)>,
}

impl Application {
    pub fn new() -> Self {
        let defaults = RuntimeConfig::default();
        Self {
            title: defaults.title,
            width: defaults.initial_size.width,
            height: defaults.initial_size.height,
            target_fps: defaults.target_fps,
            fonts: Vec::new(),
        }
    }

    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Registers a font under `name`. The first font that loads becomes the
    /// default for widgets whose style names none.
    pub fn font(mut self, name: impl Into<String>, data: Vec<u8>) -> Self {
        self.fonts.push((name.into(), data));
        self
    }

    /// Loads fonts, builds the scenes with `build` and runs until the window closes.
    pub fn run<F>(self, build: F) -> Result<()>
    where
        F: FnOnce(&mut Assets<'_>) -> Result<Navigator>,
    {
        let mut font_system = FontSystem::new();
        let mut map = HashMap::new();
        let mut default_font = None;
        for (name, bytes) in &self.fonts {
            match font_system.load_font(bytes) {
                Ok(id) => {
                    default_font.get_or_insert(id);
                    map.insert(name.clone(), id);
                }
                Err(e) => log::warn!("failed to load font '{name}': {e}"),
            }
        }
        let fonts = FontMap(map);

        let mut images = ImageStore::new();
        let navigator = build(&mut Assets { fonts: &fonts, images: &mut images })?;
        log::info!("starting on scene {}", navigator.current_id());

        let state = UiAppState {
            navigator,
            fonts: font_system,
            default_font,
            images,
            draw_list: DrawList::new(),
            renderer: Renderer::new(),
        };
        let config = RuntimeConfig {
            title: self.title,
            initial_size: LogicalSize::new(self.width, self.height),
            resizable: false,
            target_fps: self.target_fps,
        };
        Runtime::run(config, GpuInit::default(), state)
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

// ── UiAppState ────────────────────────────────────────────────────────────

/// Implements the engine's `App`; user code never sees it.
struct UiAppState {
    navigator: Navigator,
    fonts: FontSystem,
    default_font: Option<FontId>,
    images: ImageStore,
    draw_list: DrawList,
    renderer: Renderer,
}

impl EngineApp for UiAppState {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let events: Vec<UiEvent> = ctx.events.iter().filter_map(UiEvent::from_input).collect();
        self.navigator.process_input(&events);

        let layout = LayoutCtx::new(&self.fonts, self.default_font, ctx.dt);
        self.navigator.update(&layout);

        self.draw_list.clear();
        {
            let mut painter = Painter::new(&mut self.draw_list, &self.fonts, self.default_font);
            self.navigator.render(&mut painter, ctx.viewport().bounds());
        }

        let Self { renderer, draw_list, fonts, images, .. } = &mut *self;
        let control = ctx.render(WHITE, |rctx, target| renderer.render(rctx, target, draw_list, fonts, images));

        self.navigator.finish_frame();
        control
    }
}
