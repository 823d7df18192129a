use anyhow::Result;
use chrono::Local;
use ocrtunes_ui::prelude::*;

use super::{Env, LIBRARY, MAIN_MENU, TUTORIAL};
use crate::catalogue::GENRES;
use crate::validate::{self, ProfileForm};

const PANEL_Y: f32 = 90.0;
const PANEL_SIZE: f32 = 775.0;
const PANEL_START_X: f32 = 10.0;
const PANEL_END_X: f32 = 302.0;
/// Peak opacity of the faded-in text.
const TEXT_ALPHA: f32 = 200.0 / 255.0;

const SLIDE: usize = 0;
const TITLE: usize = 1;
const FORM: usize = 2;

/// Profile form shown once after sign-up.
///
/// On arrival the panel slides to the centre, then the title and the form
/// fade in. Input waits until the animation ends.
pub struct Tutorial {
    core: SceneCore,
    env: Env,
    user: Option<String>,
    intro: ModalAnimation,
    error: WidgetKey<TextField>,
    title: WidgetKey<TextField>,
    submit: WidgetKey<Button>,
    back: WidgetKey<Button>,
    full_name: WidgetKey<TextField>,
    dob: WidgetKey<TextField>,
    artist: WidgetKey<TextField>,
    genre: WidgetKey<DropDown>,
}

impl Tutorial {
    pub fn new(env: &Env) -> Result<Self> {
        let mut core = SceneCore::new(TUTORIAL);
        let w = &mut core.widgets;
        let look = env
            .style(32.0)
            .background(style::CREAM)
            .active(style::VANILLA)
            .text(style::BLACK);

        let error = w.add(super::label(380.0, 20.0, 600.0, 50.0, "", env.error_style(32.0))?);
        let title = w.add(super::label(622.0, 100.0, 200.0, 50.0, "Tell us a bit about you...", look.clone())?);
        let submit = w.add(Button::new(&WidgetConfig::new(380.0, 810.0, 300.0, 45.0).text("Submit"), look.clone())?);
        let back = w.add(Button::new(&WidgetConfig::new(695.0, 810.0, 300.0, 45.0).text("Back"), look.clone())?);

        let mut field = |x: f32, y: f32, w_: f32, text: &str, max: usize| -> Result<WidgetKey<TextField>> {
            let cfg = WidgetConfig::new(x, y, w_, 45.0).text(text).editable(true).max_length(max);
            Ok(w.add(TextField::new(&cfg, look.clone())?))
        };
        let full_name = field(380.0, 200.0, 600.0, "Full Name", 40)?;
        let dob = field(480.0, 280.0, 400.0, "Birthday (DD/MM/YYYY)", 10)?;
        let artist = field(430.0, 360.0, 500.0, "Favourite Artist", 40)?;

        let genre_cfg = WidgetConfig::new(430.0, 440.0, 500.0, 45.0).placeholder("Favourite Genre");
        let genre = w.add(DropDown::new(&genre_cfg, &GENRES, look)?);

        let intro = ModalAnimation::new(vec![
            Tween::new(PANEL_START_X, PANEL_END_X, 0.3),
            Tween::new(0.0, TEXT_ALPHA, 1.0),
            Tween::new(0.0, TEXT_ALPHA, 1.0),
        ]);

        Ok(Self {
            core,
            env: env.clone(),
            user: None,
            intro,
            error,
            title,
            submit,
            back,
            full_name,
            dob,
            artist,
            genre,
        })
    }

    fn reset_form(&mut self) {
        let w = &mut self.core.widgets;
        for key in [self.full_name, self.dob, self.artist] {
            w[key].reset();
        }
        w[self.genre].reset();
        w[self.error].set_text("");
    }

    fn fail(&mut self, message: &str) {
        self.core.widgets[self.error].set_text(message);
    }

    fn submit(&mut self) {
        let Some(user) = self.user.clone() else {
            log::warn!("tutorial submitted without a signed-in user");
            return;
        };
        let w = &self.core.widgets;
        let form = ProfileForm {
            full_name: w[self.full_name].value(),
            dob: w[self.dob].value(),
            favourite_artist: w[self.artist].value(),
            favourite_genre: w[self.genre].value(),
        };
        let profile = match validate::profile(&form, Local::now().date_naive()) {
            Ok(p) => p,
            Err(e) => return self.fail(&e.to_string()),
        };
        let saved = self.env.store.borrow_mut().set_profile(&user, profile);
        match saved {
            Ok(()) => {
                self.reset_form();
                self.core.request(LIBRARY);
            }
            Err(e) => self.fail(&super::store_failure(&e)),
        }
    }

    /// Abandons sign-up: the fresh account is removed.
    fn back(&mut self) {
        if let Some(user) = self.user.take() {
            if let Err(e) = self.env.store.borrow_mut().delete_user(&user) {
                super::store_failure(&e);
            }
        }
        self.reset_form();
        self.core.request(MAIN_MENU);
    }
}

impl Scene for Tutorial {
    fn core(&self) -> &SceneCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SceneCore {
        &mut self.core
    }

    fn on_event(&mut self, event: &UiEvent, _ctx: &mut SceneCtx<'_>) {
        if self.core.widgets.clicked(self.submit, event) {
            self.submit();
        } else if self.core.widgets.clicked(self.back, event) {
            self.back();
        }
    }

    fn update(&mut self, ctx: &LayoutCtx<'_>) {
        self.intro.step(ctx.dt);
        self.core.update(ctx);
    }

    fn render(&self, painter: &mut Painter<'_>, bounds: Rect) {
        self.core.draw_background(painter, bounds);
        let panel = Rect::new(self.intro.value(SLIDE), PANEL_Y, PANEL_SIZE, PANEL_SIZE);
        painter.fill_rounded_rect(panel, 10.0, style::DARK_BLUE, None);

        let w = &self.core.widgets;
        w[self.error].draw(painter);
        w[self.submit].draw(painter);
        w[self.back].draw(painter);
        painter.with_opacity(self.intro.value(TITLE), |p| w[self.title].draw(p));
        painter.with_opacity(self.intro.value(FORM), |p| {
            w[self.full_name].draw(p);
            w[self.dob].draw(p);
            w[self.artist].draw(p);
            w[self.genre].draw(p);
        });
    }

    fn is_blocking(&self) -> bool {
        self.intro.is_running()
    }

    fn receive(&mut self, message: &SceneMessage) {
        if let SceneMessage::SetUser(user) = message {
            self.user = Some(user.clone());
            self.intro.start();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::testing::{env, fill, frame, press};
    use crate::screens::build;

    /// Signs `sparky` up through the main menu and lands on this screen.
    fn arrive(nav: &mut Navigator) {
        let mut events = fill(830.0, 340.0, "sparky");
        events.extend(fill(830.0, 400.0, "pw"));
        events.extend(fill(830.0, 460.0, "pw"));
        events.push(press(830.0, 560.0));
        frame(nav, &events);
        assert_eq!(nav.current_id(), &TUTORIAL);
    }

    fn finish_intro(nav: &mut Navigator) {
        for _ in 0..150 {
            frame(nav, &[]);
        }
        assert!(!nav.current().is_blocking());
    }

    fn error_text(nav: &Navigator) -> String {
        let t = nav.get::<Tutorial>(&TUTORIAL).unwrap();
        t.core.widgets[t.error].text().to_owned()
    }

    // ── animation ─────────────────────────────────────────────────────────

    #[test]
    fn input_waits_for_the_intro() {
        let (_dir, env) = env();
        let mut nav = build(&env).unwrap();
        arrive(&mut nav);
        assert!(nav.current().is_blocking());

        frame(&mut nav, &[press(700.0, 820.0)]);
        assert_eq!(nav.current_id(), &TUTORIAL);
        assert_eq!(nav.deferred_len(), 1);

        finish_intro(&mut nav);
        // the queued Back press is replayed once the intro ends
        assert_eq!(nav.current_id(), &MAIN_MENU);
        assert!(!env.store.borrow().user_exists("sparky"));
    }

    #[test]
    fn panel_ends_centred() {
        let (_dir, env) = env();
        let mut nav = build(&env).unwrap();
        arrive(&mut nav);
        finish_intro(&mut nav);
        let t = nav.get::<Tutorial>(&TUTORIAL).unwrap();
        assert_eq!(t.intro.value(SLIDE), PANEL_END_X);
        assert_eq!(t.intro.value(FORM), TEXT_ALPHA);
    }

    // ── submit ────────────────────────────────────────────────────────────

    #[test]
    fn bad_date_is_reported_first() {
        let (_dir, env) = env();
        let mut nav = build(&env).unwrap();
        arrive(&mut nav);
        finish_intro(&mut nav);
        frame(&mut nav, &[press(390.0, 820.0)]);
        assert_eq!(error_text(&nav), "Invalid Date of Birth (DD/MM/YYYY)");
        assert_eq!(nav.current_id(), &TUTORIAL);
    }

    #[test]
    fn complete_profile_is_saved() {
        let (_dir, env) = env();
        let mut nav = build(&env).unwrap();
        arrive(&mut nav);
        finish_intro(&mut nav);

        let mut events = fill(390.0, 210.0, "Ada Lovelace");
        events.extend(fill(490.0, 290.0, "10/12/1990"));
        events.extend(fill(440.0, 370.0, "SZA"));
        events.push(press(440.0, 450.0));
        // sorted menu below the header: Pop, RNB, Rap, Rock
        events.push(press(440.0, 590.0));
        events.push(press(390.0, 820.0));
        frame(&mut nav, &events);

        assert_eq!(nav.current_id(), &LIBRARY);
        let store = env.store.borrow();
        let user = store.user("sparky").unwrap();
        assert_eq!(user.full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(user.favourite_genre.as_deref(), Some("Rap"));
    }
}
