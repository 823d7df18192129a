use anyhow::Result;
use ocrtunes_ui::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{DEFAULT_COVER, Env, LIBRARY, MakerRequest, PLAYLIST_MAKER, PLAYLIST_VIEWER, Sidebar};
use crate::catalogue::{self, Criteria, GENRES};
use crate::validate;

const CONFIRM: &str = "Confirm";
const SAVED: &str = "Playlist Saved!";

/// Genre shortcuts: label and x position.
const SHORTCUTS: [(&str, f32); 4] = [("Rock", 172.0), ("Rap", 325.0), ("Pop", 475.0), ("RNB", 630.0)];

/// The full catalogue with search, genre shortcuts and a random playlist
/// generator.
pub struct Library {
    core: SceneCore,
    env: Env,
    user: Option<String>,
    sidebar: Sidebar,
    songs: WidgetKey<ScrollableList<Song>>,
    search: WidgetKey<SearchOverlay<Song>>,
    shortcuts: Vec<(WidgetKey<Button>, &'static str)>,
    error: WidgetKey<TextField>,
    artist: WidgetKey<TextField>,
    length: WidgetKey<TextField>,
    genre: WidgetKey<DropDown>,
    count: WidgetKey<DropDown>,
    confirm: WidgetKey<Button>,
    rng: StdRng,
}

impl Library {
    pub fn new(env: &Env) -> Result<Self> {
        let mut core = SceneCore::new(LIBRARY).with_background_image(Some(env.images.library_bg));
        let w = &mut core.widgets;

        let list_style = ListStyle::default().font(env.bold, BODY_SIZE).guard(Color::rgb8(242, 245, 254));
        let songs = w.add(ScrollableList::new(
            &WidgetConfig::new(180.0, 400.0, 750.0, 50.0),
            env.catalogue.to_vec(),
            7,
            list_style,
        )?);
        // one heading per list column
        let column = (750.0 - 40.0) / 4.0;
        for (i, heading) in ["Title", "Artist", "Genre", "Duration"].into_iter().enumerate() {
            let cfg = WidgetConfig::new(180.0 + column * i as f32, 350.0, column, 50.0)
                .text(heading)
                .background(false)
                .centred(false);
            w.add(TextField::new(&cfg, env.plain(BODY_SIZE))?);
        }

        let sidebar = Sidebar::add(w, env, ("Make Playlist", PLAYLIST_MAKER), ("My Playlists", PLAYLIST_VIEWER))?;
        let search_cfg = WidgetConfig::new(250.0, 18.0, 760.0, 60.0).background(false);
        let search = w.add(SearchOverlay::new(&search_cfg, env.catalogue.to_vec(), env.plain(BODY_SIZE))?);

        let mut shortcuts = Vec::with_capacity(SHORTCUTS.len());
        for (genre, x) in SHORTCUTS {
            let cfg = WidgetConfig::new(x, 170.0, 200.0, 100.0).text(genre).background(false);
            shortcuts.push((w.add(Button::new(&cfg, env.plain(32.0))?), genre));
        }

        let field = env.style(BODY_SIZE);
        let artist_cfg = WidgetConfig::new(1055.0, 110.0, 300.0, 50.0).text("Artist").editable(true).max_length(22);
        let artist = w.add(TextField::new(&artist_cfg, field.clone())?);
        let length_cfg = WidgetConfig::new(1090.0, 170.0, 100.0, 40.0).text("Length(m)").editable(true).max_length(2);
        let length = w.add(TextField::new(&length_cfg, field.clone())?);
        let counts: Vec<String> = (1..=5).map(|n| n.to_string()).collect();
        let count = w.add(DropDown::new(
            &WidgetConfig::new(1190.0, 170.0, 60.0, 40.0).placeholder("Songs"),
            &counts,
            field.clone(),
        )?);
        let genre = w.add(DropDown::new(
            &WidgetConfig::new(1250.0, 170.0, 60.0, 40.0).placeholder("Genre"),
            &GENRES,
            field.clone(),
        )?);
        let confirm = w.add(Button::new(&WidgetConfig::new(1055.0, 415.0, 300.0, 30.0).text(CONFIRM), field)?);
        let error = w.add(super::label(240.0, 70.0, 760.0, 50.0, "", env.error_style(BODY_SIZE))?);

        Ok(Self {
            core,
            env: env.clone(),
            user: None,
            sidebar,
            songs,
            search,
            shortcuts,
            error,
            artist,
            length,
            genre,
            count,
            confirm,
            rng: StdRng::from_entropy(),
        })
    }

    fn fail(&mut self, message: &str) {
        self.core.widgets[self.error].set_text(message);
    }

    fn criteria(&self) -> Result<Criteria, validate::ValidationError> {
        let w = &self.core.widgets;
        let max_minutes = w[self.length].value().map(validate::minutes).transpose()?;
        Ok(Criteria {
            artist: w[self.artist].value().map(str::to_owned),
            genre: w[self.genre].value().map(str::to_owned),
            max_minutes,
            max_songs: w[self.count].value().and_then(|n| n.parse().ok()),
        })
    }

    /// Generates a random playlist and saves it under the next default name.
    fn generate(&mut self, ctx: &mut SceneCtx<'_>) {
        let Some(user) = self.user.clone() else {
            log::warn!("playlist generated without a signed-in user");
            return;
        };
        let songs = match self.criteria().and_then(|c| catalogue::generate(&self.env.catalogue, &c, &mut self.rng)) {
            Ok(songs) => songs,
            Err(e) => return self.fail(&e.to_string()),
        };
        let saved = {
            let mut store = self.env.store.borrow_mut();
            let name = store.next_default_name(&user);
            let count = songs.len();
            store
                .create(&user, &name, PlaylistRecord { songs, img: DEFAULT_COVER.to_owned() })
                .map(|()| log::info!("generated {name:?} with {count} songs for {user}"))
        };
        match saved {
            Ok(()) => {
                self.core.widgets[self.confirm].set_label(SAVED);
                ctx.broadcast(SceneMessage::Refresh);
            }
            Err(e) => self.fail(&super::store_failure(&e)),
        }
    }

    /// Any generator input being edited clears the last outcome.
    fn generator_touched(&self) -> bool {
        let w = &self.core.widgets;
        w[self.artist].is_active() || w[self.length].is_active() || w[self.genre].is_active() || w[self.count].is_active()
    }

    fn open_maker(&mut self, request: MakerRequest, ctx: &mut SceneCtx<'_>) {
        ctx.post(PLAYLIST_MAKER, SceneMessage::custom(request));
        self.core.request(PLAYLIST_MAKER);
    }
}

impl Scene for Library {
    fn core(&self) -> &SceneCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SceneCore {
        &mut self.core
    }

    fn on_event(&mut self, event: &UiEvent, ctx: &mut SceneCtx<'_>) {
        self.core.follow_redirects();
        if self.core.widgets.clicked(self.sidebar.first, event) {
            ctx.post(PLAYLIST_MAKER, SceneMessage::custom(MakerRequest::Reset));
        }

        // search results float over the list and the shortcuts
        let w = &mut self.core.widgets;
        let found = w[self.search].take_selected();
        let listed = w[self.songs].take_selected();
        if let Some(song) = found.or(listed) {
            log::debug!("library: picked {}", song.name);
            return self.open_maker(MakerRequest::Add(song), ctx);
        }

        let shortcut = self.shortcuts.iter().find(|(key, _)| self.core.widgets.clicked(*key, event));
        if let Some(&(_, genre)) = shortcut {
            return self.open_maker(MakerRequest::Genre(genre.to_owned()), ctx);
        }

        if self.generator_touched() {
            self.fail("");
            self.core.widgets[self.confirm].set_label(CONFIRM);
        }
        if self.core.widgets.clicked(self.confirm, event) {
            self.generate(ctx);
        }
    }

    fn receive(&mut self, message: &SceneMessage) {
        if let SceneMessage::SetUser(user) = message {
            self.user = Some(user.clone());
            let w = &mut self.core.widgets;
            for key in [self.artist, self.length] {
                w[key].reset();
            }
            w[self.genre].reset();
            w[self.count].reset();
            w[self.error].set_text("");
            w[self.confirm].set_label(CONFIRM);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::PlaylistMaker;
    use crate::screens::testing::{USER, env, fill, frame, press, signed_in, type_text};

    fn library(nav: &Navigator) -> &Library {
        nav.get::<Library>(&LIBRARY).unwrap()
    }

    fn error_text(nav: &Navigator) -> String {
        let l = library(nav);
        l.core.widgets[l.error].text().to_owned()
    }

    // ── song selection ────────────────────────────────────────────────────

    #[test]
    fn picking_a_row_opens_the_maker_with_it() {
        let (_dir, env) = env();
        let mut nav = signed_in(&env);
        frame(&mut nav, &[press(300.0, 420.0)]);
        assert_eq!(nav.current_id(), &PLAYLIST_MAKER);
        let maker = nav.get::<PlaylistMaker>(&PLAYLIST_MAKER).unwrap();
        let names: Vec<_> = maker.playlist().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["505"]);
    }

    #[test]
    fn picking_a_search_result_opens_the_maker() {
        let (_dir, env) = env();
        let mut nav = signed_in(&env);
        let mut events = vec![press(300.0, 40.0)];
        events.extend(type_text("sza"));
        frame(&mut nav, &events);
        // first result sits right below the field
        frame(&mut nav, &[press(300.0, 100.0)]);
        assert_eq!(nav.current_id(), &PLAYLIST_MAKER);
        let maker = nav.get::<PlaylistMaker>(&PLAYLIST_MAKER).unwrap();
        assert_eq!(maker.playlist()[0].name, "Kill Bill");
    }

    #[test]
    fn genre_shortcut_filters_the_maker() {
        let (_dir, env) = env();
        let mut nav = signed_in(&env);
        frame(&mut nav, &[press(400.0, 220.0)]);
        assert_eq!(nav.current_id(), &PLAYLIST_MAKER);
        let maker = nav.get::<PlaylistMaker>(&PLAYLIST_MAKER).unwrap();
        let offered: Vec<_> = maker.other_songs().iter().map(|s| s.genre.as_str()).collect();
        assert_eq!(offered, ["Rap"]);
    }

    // ── generator ─────────────────────────────────────────────────────────

    #[test]
    fn generator_needs_a_criterion() {
        let (_dir, env) = env();
        let mut nav = signed_in(&env);
        frame(&mut nav, &[press(1060.0, 420.0)]);
        assert_eq!(error_text(&nav), "Select either a maximum duration, a maximum number of songs, or an artist");
        assert_eq!(env.store.borrow().playlists(USER).count(), 0);
    }

    #[test]
    fn generator_rejects_non_numeric_length() {
        let (_dir, env) = env();
        let mut nav = signed_in(&env);
        let mut events = fill(1100.0, 180.0, "ab");
        events.push(press(1060.0, 420.0));
        frame(&mut nav, &events);
        assert_eq!(error_text(&nav), "Length must be a number");
    }

    #[test]
    fn generated_playlist_is_saved() {
        let (_dir, env) = env();
        let mut nav = signed_in(&env);
        // open the song count menu and pick "2", the second row below it
        frame(&mut nav, &[press(1200.0, 180.0), press(1200.0, 255.0), press(1060.0, 420.0)]);

        let store = env.store.borrow();
        let saved = store.playlist(USER, "My Playlist #1").unwrap();
        assert_eq!(saved.songs.len(), 2);
        assert_eq!(saved.img, DEFAULT_COVER);
        let l = library(&nav);
        assert_eq!(l.core.widgets[l.confirm].label(), SAVED);
    }

    #[test]
    fn unknown_artist_is_reported() {
        let (_dir, env) = env();
        let mut nav = signed_in(&env);
        let mut events = fill(1060.0, 120.0, "Nobody");
        events.push(press(1060.0, 420.0));
        frame(&mut nav, &events);
        assert_eq!(error_text(&nav), "Artist not in song library");

        // editing a generator input clears the message
        frame(&mut nav, &[press(1060.0, 120.0)]);
        assert_eq!(error_text(&nav), "");
    }
}
