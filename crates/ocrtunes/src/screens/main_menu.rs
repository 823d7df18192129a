use anyhow::Result;
use ocrtunes_ui::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Env, LIBRARY, MAIN_MENU, TUTORIAL};
use crate::validate::{self, SignUpForm, ValidationError};

const MAX_PARTICLES: usize = 5;
const SPAWN: Vec2 = Vec2::new(450.0, 500.0);
/// Particle speeds and lifetimes are in frames at this rate.
const FRAME_RATE: f32 = 60.0;

struct Particle {
    pos: Vec2,
    vel: Vec2,
    /// Frames left.
    life: f32,
    image: ImageId,
    size: f32,
}

/// Log-in and sign-up forms over a stream of rising particles.
pub struct MainMenu {
    core: SceneCore,
    env: Env,
    error: WidgetKey<TextField>,
    sign_up: WidgetKey<Button>,
    log_in: WidgetKey<Button>,
    s_username: WidgetKey<TextField>,
    s_password: WidgetKey<TextField>,
    s_confirm: WidgetKey<TextField>,
    l_username: WidgetKey<TextField>,
    l_password: WidgetKey<TextField>,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl MainMenu {
    pub fn new(env: &Env) -> Result<Self> {
        let mut core = SceneCore::new(MAIN_MENU).with_background_image(Some(env.images.menu_bg));
        let w = &mut core.widgets;

        let error = w.add(super::label(850.0, 650.0, 500.0, 50.0, "", env.error_style(32.0))?);
        let action = env.style(BODY_SIZE).background(style::DARK_BLUE).active(style::NAVY);
        let sign_up = w.add(Button::new(&WidgetConfig::new(825.0, 550.0, 225.0, 50.0).text("Sign Up"), action.clone())?);
        let log_in = w.add(Button::new(&WidgetConfig::new(1150.0, 550.0, 225.0, 50.0).text("Log In"), action)?);

        let mut field = |x: f32, y: f32, text: &str| -> Result<WidgetKey<TextField>> {
            let cfg = WidgetConfig::new(x, y, 225.0, 50.0).text(text).editable(true).max_length(22);
            Ok(w.add(TextField::new(&cfg, env.style(BODY_SIZE))?))
        };
        let s_username = field(825.0, 330.0, "Username")?;
        let s_password = field(825.0, 390.0, "Password")?;
        let s_confirm = field(825.0, 450.0, "Confirm Password")?;
        let l_username = field(1150.0, 330.0, "Username")?;
        let l_password = field(1150.0, 390.0, "Password")?;

        Ok(Self {
            core,
            env: env.clone(),
            error,
            sign_up,
            log_in,
            s_username,
            s_password,
            s_confirm,
            l_username,
            l_password,
            particles: Vec::new(),
            rng: StdRng::from_entropy(),
        })
    }

    fn text(&self, key: WidgetKey<TextField>) -> Option<String> {
        self.core.widgets[key].value().map(str::to_owned)
    }

    fn fail(&mut self, message: &str) {
        self.core.widgets[self.error].set_text(message);
    }

    /// Clears both forms, announces the user and leaves for `to`.
    fn enter(&mut self, username: String, to: SceneId, ctx: &mut SceneCtx<'_>) {
        let w = &mut self.core.widgets;
        for key in [self.s_username, self.s_password, self.s_confirm, self.l_username, self.l_password] {
            w[key].reset();
        }
        w[self.error].set_text("");
        log::info!("signed in as {username}");
        ctx.broadcast(SceneMessage::SetUser(username));
        self.core.request(to);
    }

    fn try_log_in(&mut self, ctx: &mut SceneCtx<'_>) {
        let (username, password) = (self.text(self.l_username), self.text(self.l_password));
        match (username, password) {
            (Some(u), Some(p)) if self.env.store.borrow().login(&u, &p) => self.enter(u, LIBRARY, ctx),
            _ => self.fail(&ValidationError::BadCredentials.to_string()),
        }
    }

    fn try_sign_up(&mut self, ctx: &mut SceneCtx<'_>) {
        let (username, password, confirm) =
            (self.text(self.s_username), self.text(self.s_password), self.text(self.s_confirm));
        let form = SignUpForm { username: username.as_deref(), password: password.as_deref(), confirm: confirm.as_deref() };
        let checked = {
            let store = self.env.store.borrow();
            validate::sign_up(&form, |u| store.user_exists(u)).map(|(u, p)| (u.to_owned(), p.to_owned()))
        };
        let (username, password) = match checked {
            Ok(credentials) => credentials,
            Err(e) => return self.fail(&e.to_string()),
        };
        let saved = self.env.store.borrow_mut().sign_up(&username, &password);
        match saved {
            Ok(()) => self.enter(username, TUTORIAL, ctx),
            Err(e) => self.fail(&super::store_failure(&e)),
        }
    }

    fn step_particles(&mut self, dt: f32) {
        let frames = dt * FRAME_RATE;
        for p in &mut self.particles {
            p.pos += p.vel * frames;
            p.life -= frames;
        }
        self.particles.retain(|p| p.life > 0.0);
        if self.particles.len() < MAX_PARTICLES {
            let size = self.rng.gen_range(32..=72) as f32;
            let particle = Particle {
                pos: SPAWN,
                vel: Vec2::new(self.rng.gen_range(5..=20) as f32 / 8.0, -2.0),
                life: self.rng.gen_range(20..=100) as f32,
                image: self.env.images.particles[self.rng.gen_range(0..4)],
                size,
            };
            self.particles.push(particle);
        }
    }
}

impl Scene for MainMenu {
    fn core(&self) -> &SceneCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SceneCore {
        &mut self.core
    }

    fn on_event(&mut self, event: &UiEvent, ctx: &mut SceneCtx<'_>) {
        if self.core.widgets.clicked(self.log_in, event) {
            self.try_log_in(ctx);
        } else if self.core.widgets.clicked(self.sign_up, event) {
            self.try_sign_up(ctx);
        }
    }

    fn update(&mut self, ctx: &LayoutCtx<'_>) {
        self.core.update(ctx);
        self.step_particles(ctx.dt);
    }

    fn render(&self, painter: &mut Painter<'_>, bounds: Rect) {
        self.core.draw_background(painter, bounds);
        self.core.draw_widgets(painter);
        for p in &self.particles {
            painter.image(p.image, Rect::new(p.pos.x, p.pos.y, p.size, p.size));
        }
    }
}
