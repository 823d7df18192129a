use anyhow::Result;
use ocrtunes_ui::prelude::*;

use super::{Env, LIBRARY, PLAYLIST_MAKER, PLAYLIST_VIEWER, Sidebar};
use crate::store::StoreError;
use crate::validate::ValidationError;

/// Keys of the detail popup's widgets.
#[derive(Clone, Copy)]
struct Sheet {
    name: WidgetKey<TextField>,
    exit: WidgetKey<Button>,
    song_count: WidgetKey<TextField>,
    track_length: WidgetKey<TextField>,
    songs: WidgetKey<ScrollableList<Song>>,
    delete: WidgetKey<Button>,
    cover: WidgetKey<Panel>,
    error: WidgetKey<TextField>,
}

impl Sheet {
    fn add(widgets: &mut WidgetSet, env: &Env) -> Result<Self> {
        widgets.add(Panel::new(Rect::new(330.0, 125.0, 900.0, 700.0), style::WHITE, 25.0));
        let info = Style::default().font(env.regular, 25.0).text(style::BLACK);
        let line = |y: f32| WidgetConfig::new(500.0, y, 200.0, 50.0).background(false).centred(false);

        let name_cfg = WidgetConfig::new(500.0, 60.0, 700.0, 200.0)
            .editable(true)
            .max_length(44)
            .background(false)
            .centred(false);
        let name = widgets.add(TextField::new(&name_cfg, env.plain(32.0))?);
        let exit = widgets.add(Button::new(&WidgetConfig::new(1170.0, 125.0, 100.0, 100.0), Style::default())?.with_icon(env.images.cross));
        let song_count = widgets.add(TextField::new(&line(180.0), info.clone())?);
        let track_length = widgets.add(TextField::new(&line(210.0), info)?);
        let songs = widgets.add(ScrollableList::new(
            &WidgetConfig::new(350.0, 350.0, 750.0, 50.0),
            Vec::new(),
            6,
            ListStyle::default().font(env.bold, BODY_SIZE).guard(style::WHITE),
        )?);
        let delete = widgets.add(Button::new(&WidgetConfig::new(560.0, 260.0, 50.0, 50.0), Style::default())?.with_icon(env.images.bin));
        let cover = widgets.add(Panel::image(Rect::new(350.0, 145.0, 130.0, 130.0), env.images.default_cover));
        let error_cfg = WidgetConfig::new(330.0, 290.0, 900.0, 50.0).background(false).centred(false);
        let error = widgets.add(TextField::new(&error_cfg, env.error_style(25.0))?);
        Ok(Self { name, exit, song_count, track_length, songs, delete, cover, error })
    }
}

/// The signed-in user's playlists as a grid of cards.
///
/// Selecting a card opens a popup with its details. Leaving the popup's name
/// field renames the playlist; a taken name is refused and the field rolls
/// back.
pub struct PlaylistViewer {
    core: SceneCore,
    env: Env,
    user: Option<String>,
    grid: WidgetKey<GridSlide>,
    sheet: Sheet,
    /// Playlist shown in the popup.
    shown: Option<String>,
    was_editing: bool,
}

impl PlaylistViewer {
    pub fn new(env: &Env) -> Result<Self> {
        let mut popup = Popup::new(Rect::new(163.0, 0.0, 1074.0, 900.0))
            .with_backdrop(Rect::new(163.0, 0.0, 1074.0, 900.0), Color::rgb8(168, 182, 250).with_alpha(200.0 / 255.0));
        let sheet = Sheet::add(&mut popup.widgets, env)?;

        let mut core =
            SceneCore::new(PLAYLIST_VIEWER).with_background_image(Some(env.images.viewer_bg)).with_popup(popup);
        let w = &mut core.widgets;
        Sidebar::add(w, env, ("Home", LIBRARY), ("Make Playlist", PLAYLIST_MAKER))?;
        let grid = w.add(GridSlide::new(
            &WidgetConfig::new(225.0, 80.0, 350.0, 250.0),
            Vec::new(),
            3,
            3,
            ListStyle::default().font(env.bold, BODY_SIZE).guard(style::WHITE),
        )?);
        w.add(super::label(675.0, 20.0, 200.0, 50.0, "My Playlists", env.plain(36.0))?);

        Ok(Self { core, env: env.clone(), user: None, grid, sheet, shown: None, was_editing: false })
    }

    fn sheet(&self) -> &WidgetSet {
        &self.core.popup().expect("viewer is built with a popup").widgets
    }

    fn sheet_mut(&mut self) -> &mut WidgetSet {
        &mut self.core.popup_mut().expect("viewer is built with a popup").widgets
    }

    fn fail(&mut self, message: &str) {
        let error = self.sheet.error;
        self.sheet_mut()[error].set_text(message);
    }

    /// Rebuilds the cards from the store.
    fn reload(&mut self) {
        let cards = match self.user.as_deref() {
            Some(user) => {
                let store = self.env.store.borrow();
                store
                    .playlists(user)
                    .map(|(name, record)| PlaylistCard::new(name, record, self.env.images.cover(&record.img)))
                    .collect()
            }
            None => Vec::new(),
        };
        log::debug!("playlist viewer: {} cards", cards.len());
        self.core.widgets[self.grid].set_cards(cards);
    }

    fn open(&mut self, name: String) {
        let Some(user) = self.user.clone() else { return };
        let record = self.env.store.borrow().playlist(&user, &name).cloned();
        let Some(record) = record else {
            log::warn!("selected playlist {name:?} is gone");
            return self.reload();
        };
        let k = self.sheet;
        let cover = self.env.images.cover(&record.img);
        let s = self.sheet_mut();
        s[k.name].set_placeholder(name.as_str());
        s[k.name].reset();
        s[k.song_count].set_text(&format!("Total Songs: {}", record.songs.len()));
        s[k.track_length].set_text(&format!("Total Length: {} minutes", record.total_minutes()));
        s[k.songs].set_items(record.songs);
        s.reset_scroll();
        s[k.cover].set_image(cover);
        s[k.error].set_text("");
        self.shown = Some(name);
        self.was_editing = false;
        self.core.set_popup_open(true);
    }

    fn close(&mut self) {
        self.shown = None;
        self.core.set_popup_open(false);
    }

    /// Applies the name field once editing ends.
    fn finish_rename(&mut self) {
        let (Some(user), Some(old)) = (self.user.clone(), self.shown.clone()) else { return };
        let k = self.sheet;
        let typed = self.sheet()[k.name].value().map(str::trim).filter(|n| !n.is_empty()).map(str::to_owned);
        let Some(new) = typed.filter(|n| *n != old) else {
            self.sheet_mut()[k.name].reset();
            return;
        };
        let renamed = self.env.store.borrow_mut().rename(&user, &old, &new);
        match renamed {
            Ok(()) => {
                log::info!("renamed playlist {old:?} to {new:?}");
                self.sheet_mut()[k.name].set_placeholder(new.as_str());
                self.shown = Some(new);
                self.reload();
            }
            Err(e) => {
                let message = match e {
                    StoreError::DuplicateName(_) => ValidationError::PlaylistNameTaken.to_string(),
                    e => super::store_failure(&e),
                };
                self.fail(&message);
                self.sheet_mut()[k.name].reset();
            }
        }
    }

    fn delete_shown(&mut self, ctx: &mut SceneCtx<'_>) {
        let (Some(user), Some(name)) = (self.user.clone(), self.shown.clone()) else { return };
        let deleted = self.env.store.borrow_mut().delete(&user, &name);
        match deleted {
            Ok(_) => {
                log::info!("deleted playlist {name:?}");
                self.close();
                self.reload();
                ctx.broadcast(SceneMessage::Refresh);
            }
            Err(e) => self.fail(&super::store_failure(&e)),
        }
    }
}

impl Scene for PlaylistViewer {
    fn core(&self) -> &SceneCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SceneCore {
        &mut self.core
    }

    fn on_event(&mut self, event: &UiEvent, ctx: &mut SceneCtx<'_>) {
        self.core.follow_redirects();

        if !self.core.popup_open() {
            let grid = &mut self.core.widgets[self.grid];
            let picked = grid.selected().map(|c| c.name().to_owned());
            grid.clear_selection();
            if let Some(name) = picked {
                self.open(name);
            }
            return;
        }

        let k = self.sheet;
        if event.primary_press().is_some() {
            self.fail("");
        }
        let editing = self.sheet()[k.name].is_editing();
        if self.was_editing && !editing {
            self.finish_rename();
        }
        self.was_editing = editing;

        // rows in the popup list are display only
        self.sheet_mut()[k.songs].take_selected();
        if self.sheet().clicked(k.exit, event) {
            self.close();
        } else if self.sheet().clicked(k.delete, event) {
            self.delete_shown(ctx);
        }
    }

    fn receive(&mut self, message: &SceneMessage) {
        match message {
            SceneMessage::SetUser(user) => {
                self.user = Some(user.clone());
                self.close();
                self.reload();
            }
            SceneMessage::Refresh => self.reload(),
            SceneMessage::Custom(_) => {}
        }
    }
}
