use anyhow::Result;
use ocrtunes_ui::prelude::*;

use super::{DEFAULT_COVER, Env, LIBRARY, MakerRequest, PLAYLIST_MAKER, PLAYLIST_VIEWER, Sidebar};
use crate::catalogue::{self, GENRES};
use crate::store::StoreError;
use crate::validate::ValidationError;

const ROW_GAP: f32 = 12.0;

/// Builds a playlist by hand from the catalogue.
///
/// Songs picked from the lower list join the playlist above; picking a
/// playlist row puts the song back. The lower list only offers songs matching
/// the genre boxes and artist as of the last Filter press.
pub struct PlaylistMaker {
    core: SceneCore,
    env: Env,
    user: Option<String>,
    /// Catalogue narrowed by the applied filter.
    offer: Vec<Song>,
    error: WidgetKey<TextField>,
    filters: WidgetKey<Checkboxes>,
    playlist: WidgetKey<ScrollableList<Song>>,
    other_songs: WidgetKey<ScrollableList<Song>>,
    name: WidgetKey<TextField>,
    filter: WidgetKey<Button>,
    artist: WidgetKey<TextField>,
    save: WidgetKey<Button>,
}

impl PlaylistMaker {
    pub fn new(env: &Env) -> Result<Self> {
        let mut core = SceneCore::new(PLAYLIST_MAKER).with_background_image(Some(env.images.maker_bg));
        let w = &mut core.widgets;

        Sidebar::add(w, env, ("Home", LIBRARY), ("My Playlists", PLAYLIST_VIEWER))?;
        let error = w.add(super::label(320.0, 180.0, 750.0, 50.0, "", env.error_style(32.0))?);
        let filters = w.add(
            Checkboxes::new(&WidgetConfig::new(1125.0, 270.0, 200.0, 45.0).background(false), &GENRES, env.plain(BODY_SIZE))?
                .with_tick(env.images.tick),
        );

        let rows = ListStyle::default()
            .row(style::CREAM)
            .slider(style::DARK_BLUE, style::NAVY)
            .guard(style::LIGHT_BLUE)
            .font(env.bold, BODY_SIZE);
        let list = |y: f32, items: Vec<Song>| {
            ScrollableList::with_gap(&WidgetConfig::new(220.0, y, 750.0, 30.0), items, 4, ROW_GAP, rows.clone())
        };
        let playlist = w.add(list(270.0, Vec::new())?);
        let other_songs = w.add(list(550.0, env.catalogue.to_vec())?);

        let name_cfg = WidgetConfig::new(320.0, 142.0, 750.0, 50.0)
            .placeholder("My Playlist #1")
            .editable(true)
            .max_length(40)
            .background(false)
            .centred(false)
            .radius(0.0);
        let name = w.add(TextField::new(&name_cfg, env.plain(BODY_SIZE))?);
        let filter = w.add(Button::new(&WidgetConfig::new(1150.0, 600.0, 200.0, 50.0).text("Filter"), env.style(BODY_SIZE))?);
        let artist_cfg = WidgetConfig::new(1150.0, 470.0, 200.0, 50.0).text("Artist").editable(true).max_length(22);
        let artist = w.add(TextField::new(&artist_cfg, env.style(BODY_SIZE).active(style::NAVY))?);
        let save = w.add(Button::new(
            &WidgetConfig::new(445.0, 775.0, 400.0, 50.0).text("Save Playlist"),
            env.style(BODY_SIZE).background(style::DARK_BLUE).active(style::LIGHT_BLUE),
        )?);

        Ok(Self {
            core,
            env: env.clone(),
            user: None,
            offer: env.catalogue.to_vec(),
            error,
            filters,
            playlist,
            other_songs,
            name,
            filter,
            artist,
            save,
        })
    }

    fn fail(&mut self, message: &str) {
        self.core.widgets[self.error].set_text(message);
    }

    fn default_name(&self) -> String {
        let store = self.env.store.borrow();
        store.next_default_name(self.user.as_deref().unwrap_or_default())
    }

    /// Starts a fresh playlist with no filter applied.
    fn reset(&mut self) {
        let name = self.default_name();
        let w = &mut self.core.widgets;
        w[self.filters].reset();
        w[self.artist].reset();
        w[self.playlist].set_items(Vec::new());
        w[self.name].set_placeholder(name);
        w[self.name].reset();
        w[self.error].set_text("");
        w.reset_scroll();
        self.apply_filter();
    }

    /// Narrows the offer to the checked genres and the typed artist.
    fn apply_filter(&mut self) {
        let w = &self.core.widgets;
        let genres = w[self.filters].checked();
        self.offer = catalogue::filter(&self.env.catalogue, &genres, w[self.artist].value(), &[]);
        self.refresh_offer();
    }

    /// Re-lists the offer minus whatever is already in the playlist.
    fn refresh_offer(&mut self) {
        let w = &mut self.core.widgets;
        let taken = w[self.playlist].items();
        let rest: Vec<Song> = self.offer.iter().filter(|s| !taken.contains(s)).cloned().collect();
        w[self.other_songs].set_items(rest);
    }

    fn add(&mut self, song: Song) {
        let w = &mut self.core.widgets;
        let mut songs = w[self.playlist].items().to_vec();
        if songs.contains(&song) {
            log::debug!("{} is already in the playlist", song.name);
            return;
        }
        songs.push(song);
        w[self.playlist].set_items(songs);
        self.refresh_offer();
    }

    fn remove(&mut self, song: &Song) {
        let w = &mut self.core.widgets;
        let songs = w[self.playlist].items().iter().filter(|s| *s != song).cloned().collect();
        w[self.playlist].set_items(songs);
        self.refresh_offer();
    }

    fn save(&mut self, ctx: &mut SceneCtx<'_>) {
        let Some(user) = self.user.clone() else {
            log::warn!("playlist saved without a signed-in user");
            return;
        };
        let w = &self.core.widgets;
        if w[self.playlist].items().is_empty() {
            return self.fail(&ValidationError::EmptyPlaylist.to_string());
        }
        let field = &w[self.name];
        let typed = field.value().map(str::trim).filter(|n| !n.is_empty());
        let name = typed.unwrap_or(field.placeholder()).to_owned();
        let record = PlaylistRecord { songs: w[self.playlist].items().to_vec(), img: DEFAULT_COVER.to_owned() };
        let saved = self.env.store.borrow_mut().create(&user, &name, record);
        match saved {
            Ok(()) => {
                log::info!("saved playlist {name:?} for {user}");
                ctx.broadcast(SceneMessage::Refresh);
                self.reset();
                self.core.request(LIBRARY);
            }
            Err(StoreError::DuplicateName(_)) => self.fail(&ValidationError::PlaylistNameTaken.to_string()),
            Err(e) => self.fail(&super::store_failure(&e)),
        }
    }
}

impl Scene for PlaylistMaker {
    fn core(&self) -> &SceneCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SceneCore {
        &mut self.core
    }

    fn on_event(&mut self, event: &UiEvent, ctx: &mut SceneCtx<'_>) {
        if event.primary_press().is_some() {
            self.fail("");
        }
        if let Some(to) = self.core.widgets.activated_redirect() {
            self.reset();
            self.core.request(to);
            return;
        }

        let picked = self.core.widgets[self.other_songs].take_selected();
        let dropped = self.core.widgets[self.playlist].take_selected();
        if let Some(song) = picked {
            self.add(song);
        } else if let Some(song) = dropped {
            self.remove(&song);
        }

        if self.core.widgets.clicked(self.filter, event) {
            self.apply_filter();
        } else if self.core.widgets.clicked(self.save, event) {
            self.save(ctx);
        }
    }

    fn receive(&mut self, message: &SceneMessage) {
        match message {
            SceneMessage::SetUser(user) => {
                self.user = Some(user.clone());
                self.reset();
            }
            SceneMessage::Refresh => {
                // a typed name stays; only the suggested one moves on
                if self.core.widgets[self.name].value().is_none() {
                    let name = self.default_name();
                    self.core.widgets[self.name].set_placeholder(name);
                }
            }
            SceneMessage::Custom(_) => match message.downcast::<MakerRequest>() {
                Some(MakerRequest::Reset) => self.reset(),
                Some(MakerRequest::Genre(genre)) => {
                    self.reset();
                    self.core.widgets[self.filters].set_checked(genre, true);
                    self.apply_filter();
                }
                Some(MakerRequest::Add(song)) => self.add(song.clone()),
                None => log::debug!("playlist maker ignoring {message:?}"),
            },
        }
    }
}

#[cfg(test)]
impl PlaylistMaker {
    pub(crate) fn playlist(&self) -> &[Song] {
        self.core.widgets[self.playlist].items()
    }

    pub(crate) fn other_songs(&self) -> &[Song] {
        self.core.widgets[self.other_songs].items()
    }
}
