use std::any::Any;
use std::collections::VecDeque;
use std::rc::Rc;

use ocrtunes_engine::coords::Rect;

use crate::error::NavError;
use crate::event::{EventCtx, UiEvent};
use crate::painter::Painter;
use crate::scene::{Scene, SceneId};
use crate::widget::LayoutCtx;

/// Cross-scene notification, delivered after the frame's render.
#[derive(Debug, Clone)]
pub enum SceneMessage {
    /// A user logged in (or out, with an empty name).
    SetUser(String),
    /// Shared data changed; rebuild derived widget content.
    Refresh,
    /// Application-defined payload; receivers downcast.
    Custom(Rc<dyn Any>),
}

impl SceneMessage {
    pub fn custom<T: Any>(payload: T) -> Self {
        SceneMessage::Custom(Rc::new(payload))
    }

    pub fn downcast<T: Any>(&self) -> Option<&T> {
        match self {
            SceneMessage::Custom(p) => p.downcast_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    Scene(SceneId),
    All,
}

/// Per-frame context handed to [`Scene::process_input`].
pub struct SceneCtx<'a> {
    /// Pointer snapshot, advanced once per event before dispatch.
    pub pointer: EventCtx,
    outbox: &'a mut Vec<(Recipient, SceneMessage)>,
}

impl SceneCtx<'_> {
    pub fn post(&mut self, to: SceneId, message: SceneMessage) {
        self.outbox.push((Recipient::Scene(to), message));
    }

    /// Delivers `message` to every registered scene, the sender included.
    pub fn broadcast(&mut self, message: SceneMessage) {
        self.outbox.push((Recipient::All, message));
    }
}

/// Owns every scene and tracks which one is current.
///
/// Scenes are built once and reused for the life of the process. Each frame:
/// [`process_input`](Self::process_input), [`update`](Self::update),
/// [`render`](Self::render), then [`finish_frame`](Self::finish_frame), which
/// delivers posted messages and performs any requested transition.
pub struct Navigator {
    scenes: Vec<Box<dyn Scene>>,
    current: usize,
    pointer: EventCtx,
    deferred: VecDeque<UiEvent>,
    outbox: Vec<(Recipient, SceneMessage)>,
}

impl Navigator {
    /// `initial` becomes the current scene.
    pub fn new(initial: impl Scene) -> Self {
        Self {
            scenes: vec![Box::new(initial)],
            current: 0,
            pointer: EventCtx::default(),
            deferred: VecDeque::new(),
            outbox: Vec::new(),
        }
    }

    /// Registers `scene`, replacing any scene with the same id.
    pub fn register(&mut self, scene: impl Scene) -> &mut Self {
        let scene: Box<dyn Scene> = Box::new(scene);
        match self.position(scene.id()) {
            Some(i) => {
                log::warn!("scene {} registered twice; replacing", scene.id());
                self.scenes[i] = scene;
            }
            None => self.scenes.push(scene),
        }
        self
    }

    pub fn with(mut self, scene: impl Scene) -> Self {
        self.register(scene);
        self
    }

    fn position(&self, id: &SceneId) -> Option<usize> {
        self.scenes.iter().position(|s| s.id() == id)
    }

    pub fn resolve(&self, id: &SceneId) -> Result<&dyn Scene, NavError> {
        self.position(id).map(|i| &*self.scenes[i]).ok_or_else(|| NavError::UnknownScene(id.clone()))
    }

    pub fn resolve_mut(&mut self, id: &SceneId) -> Result<&mut dyn Scene, NavError> {
        match self.position(id) {
            Some(i) => Ok(&mut *self.scenes[i]),
            None => Err(NavError::UnknownScene(id.clone())),
        }
    }

    /// Concrete scene registered as `id`.
    pub fn get<S: Scene>(&self, id: &SceneId) -> Option<&S> {
        self.resolve(id).ok()?.as_any().downcast_ref()
    }

    pub fn get_mut<S: Scene>(&mut self, id: &SceneId) -> Option<&mut S> {
        self.resolve_mut(id).ok()?.as_any_mut().downcast_mut()
    }

    #[inline]
    pub fn current(&self) -> &dyn Scene {
        &*self.scenes[self.current]
    }

    #[inline]
    pub fn current_id(&self) -> &SceneId {
        self.current().id()
    }

    /// Number of events waiting for a blocking scene to finish.
    #[inline]
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Feeds `events` to the current scene, or queues them while it blocks.
    pub fn process_input(&mut self, events: &[UiEvent]) {
        let scene = &mut self.scenes[self.current];
        if scene.is_blocking() {
            self.deferred.extend(events.iter().cloned());
            return;
        }
        let batch: Vec<UiEvent> = if self.deferred.is_empty() {
            events.to_vec()
        } else {
            log::debug!("replaying {} deferred events", self.deferred.len());
            self.deferred.drain(..).chain(events.iter().cloned()).collect()
        };
        if batch.is_empty() {
            return;
        }
        let mut ctx = SceneCtx { pointer: self.pointer, outbox: &mut self.outbox };
        scene.process_input(&batch, &mut ctx);
        self.pointer = ctx.pointer;
    }

    pub fn update(&mut self, ctx: &LayoutCtx<'_>) {
        self.scenes[self.current].update(ctx);
    }

    pub fn render(&self, painter: &mut Painter<'_>, bounds: Rect) {
        self.current().render(painter, bounds);
    }

    /// Delivers posted messages, then swaps scenes if the current one asked to.
    pub fn finish_frame(&mut self) {
        for (to, message) in std::mem::take(&mut self.outbox) {
            match to {
                Recipient::All => self.scenes.iter_mut().for_each(|s| s.receive(&message)),
                Recipient::Scene(id) => match self.resolve_mut(&id) {
                    Ok(scene) => scene.receive(&message),
                    Err(e) => log::warn!("dropping message {message:?}: {e}"),
                },
            }
        }

        let Some(next) = self.scenes[self.current].core_mut().take_next() else { return; };
        if &next == self.current_id() {
            return;
        }
        match self.position(&next) {
            Some(i) => {
                log::info!("scene transition: {} -> {}", self.current_id(), next);
                self.current = i;
                self.deferred.clear();
            }
            None => log::warn!("redirect to unknown scene {next}; staying on {}", self.current_id()),
        }
    }
}
