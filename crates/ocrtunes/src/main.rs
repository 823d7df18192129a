use std::cell::RefCell;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use ocrtunes_engine::logging::{LoggingConfig, init_logging};
use ocrtunes_ui::Application;

mod catalogue;
mod screens;
mod store;
mod validate;

use screens::{Env, Images};
use store::Store;

const DATA_DIR_VAR: &str = "OCRTUNES_DATA";
const CATALOGUE_FILE: &str = "song_list.json";

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let data = env::var_os(DATA_DIR_VAR).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("data"));
    log::info!("data directory: {}", data.display());

    let catalogue = catalogue::load(&data.join(CATALOGUE_FILE))?;
    let store = Store::open(&data).with_context(|| format!("failed to open the store in {}", data.display()))?;

    let mut app = Application::new().title("OCRtunes").size(1400.0, 900.0).target_fps(60);
    for (name, candidates) in [("regular", REGULAR_FONTS), ("bold", BOLD_FONTS)] {
        match load_font(&data, name, candidates) {
            Some(bytes) => app = app.font(name, bytes),
            None => log::warn!("no {name} font found; text metrics will be estimated"),
        }
    }

    app.run(|assets| {
        let covers: Vec<String> = store.cover_paths().into_iter().map(str::to_owned).collect();
        let images = Images::load(assets.images, &data, covers.iter().map(String::as_str));
        let env = Env {
            store: Rc::new(RefCell::new(store)),
            catalogue: catalogue.into(),
            images: Rc::new(images),
            regular: assets.fonts.get("regular"),
            bold: assets.fonts.get("bold"),
        };
        screens::build(&env)
    })
}

/// System fonts tried after `<data>/fonts/<name>.ttf`.
const REGULAR_FONTS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
];

const BOLD_FONTS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/noto/NotoSans-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
];

fn load_font(data: &Path, name: &str, fallbacks: &[&str]) -> Option<Vec<u8>> {
    let bundled = data.join("fonts").join(format!("{name}.ttf"));
    std::iter::once(bundled).chain(fallbacks.iter().map(PathBuf::from)).find_map(|path| {
        let bytes = fs::read(&path).ok()?;
        log::debug!("{name} font: {}", path.display());
        Some(bytes)
    })
}
