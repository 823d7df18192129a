use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use ocrtunes_engine::coords::Rect;
use ocrtunes_engine::images::ImageId;
use ocrtunes_engine::paint::Color;
use serde::{Deserialize, Serialize};

use crate::event::{EventCtx, UiEvent};
use crate::layout;
use crate::navigator::SceneCtx;
use crate::painter::Painter;
use crate::style::WHITE;
use crate::widget::{AsAny, Clickable, LayoutCtx, Widget};

// ── SceneId ───────────────────────────────────────────────────────────────

/// Name a scene is registered under, and the target of a redirect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SceneId(Cow<'static, str>);

impl SceneId {
    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn owned(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── WidgetSet ─────────────────────────────────────────────────────────────

/// Typed handle to a widget inside the [`WidgetSet`] that returned it.
pub struct WidgetKey<W> {
    index: usize,
    _marker: PhantomData<fn() -> W>,
}

impl<W> Clone for WidgetKey<W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W> Copy for WidgetKey<W> {}

impl<W> fmt::Debug for WidgetKey<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WidgetKey({})", self.index)
    }
}

/// Widgets in registration order.
///
/// Registration order is dispatch order and paint order: earlier widgets see
/// events first, later widgets draw on top.
#[derive(Default)]
pub struct WidgetSet {
    widgets: Vec<Box<dyn Widget>>,
}

impl WidgetSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<W: Widget>(&mut self, widget: W) -> WidgetKey<W> {
        self.widgets.push(Box::new(widget));
        WidgetKey { index: self.widgets.len() - 1, _marker: PhantomData }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Widget> {
        self.widgets.iter().map(|w| &**w)
    }

    /// Sends `event` to every widget for which `skip` is false.
    pub fn dispatch(&mut self, event: &UiEvent, ctx: &EventCtx, skip: impl Fn(&dyn Widget) -> bool) {
        for w in &mut self.widgets {
            if !skip(&**w) {
                w.handle_event(event, ctx);
            }
        }
    }

    pub fn update(&mut self, ctx: &LayoutCtx<'_>) {
        for w in &mut self.widgets {
            w.update(ctx);
        }
    }

    pub fn draw(&self, painter: &mut Painter<'_>) {
        for w in &self.widgets {
            w.draw(painter);
        }
    }

    /// Redirect of the first activated clickable that carries one.
    pub fn activated_redirect(&self) -> Option<SceneId> {
        self.iter()
            .filter_map(|w| w.as_clickable())
            .find(|c| c.activated() && c.redirect().is_some())
            .and_then(|c| c.redirect().cloned())
    }

    /// `true` when `event` is the primary press that activated `key`.
    pub fn clicked<W: Widget + Clickable>(&self, key: WidgetKey<W>, event: &UiEvent) -> bool {
        event.primary_press().is_some() && self[key].activated()
    }

    /// Scrolls every list and grid in the set back to the top.
    pub fn reset_scroll(&mut self) {
        for w in &mut self.widgets {
            if let Some(s) = w.as_scrollable_mut() {
                s.reset_scroll();
            }
        }
    }

    /// Whether any widget is mid-interaction (editing, dragging, menu open).
    pub fn any_active(&self) -> bool {
        self.iter().any(|w| w.is_active())
    }
}

impl<W: Widget> Index<WidgetKey<W>> for WidgetSet {
    type Output = W;

    /// Panics if `key` came from a different set.
    fn index(&self, key: WidgetKey<W>) -> &W {
        // deref first: the blanket `AsAny` impl also covers `Box<dyn Widget>`
        let w: &dyn Widget = &*self.widgets[key.index];
        w.as_any().downcast_ref::<W>().expect("WidgetKey used with a foreign WidgetSet")
    }
}

impl<W: Widget> IndexMut<WidgetKey<W>> for WidgetSet {
    fn index_mut(&mut self, key: WidgetKey<W>) -> &mut W {
        let w: &mut dyn Widget = &mut *self.widgets[key.index];
        w.as_any_mut().downcast_mut::<W>().expect("WidgetKey used with a foreign WidgetSet")
    }
}

// ── Popup ─────────────────────────────────────────────────────────────────

/// Modal overlay: its own widgets plus the screen region it covers.
///
/// While open, base widgets whose top-left corner lies in `region` receive no
/// events; everything else stays live.
pub struct Popup {
    pub widgets: WidgetSet,
    region: Rect,
    backdrop: Option<(Rect, Color)>,
    open: bool,
}

impl Popup {
    pub fn new(region: Rect) -> Self {
        Self { widgets: WidgetSet::new(), region, backdrop: None, open: false }
    }

    /// Shape painted between the base widgets and the popup's own widgets.
    pub fn with_backdrop(mut self, rect: Rect, color: Color) -> Self {
        self.backdrop = Some((rect, color));
        self
    }

    #[inline]
    pub fn region(&self) -> Rect {
        self.region
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn covers(&self, widget: &dyn Widget) -> bool {
        self.open && layout::origin_in(widget.rect(), self.region)
    }
}

// ── SceneCore ─────────────────────────────────────────────────────────────

/// State every scene owns: widgets, optional popup, background and the
/// transition slot.
///
/// The slot is `None` while the scene wants to stay; a scene requests a
/// transition with [`SceneCore::request`] and the navigator clears the slot
/// once it has acted on it.
pub struct SceneCore {
    id: SceneId,
    pub widgets: WidgetSet,
    popup: Option<Popup>,
    background: Color,
    background_image: Option<ImageId>,
    next: Option<SceneId>,
}

impl SceneCore {
    pub fn new(id: SceneId) -> Self {
        Self {
            id,
            widgets: WidgetSet::new(),
            popup: None,
            background: WHITE,
            background_image: None,
            next: None,
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_background_image(mut self, image: Option<ImageId>) -> Self {
        self.background_image = image;
        self
    }

    pub fn with_popup(mut self, popup: Popup) -> Self {
        self.popup = Some(popup);
        self
    }

    #[inline]
    pub fn id(&self) -> &SceneId {
        &self.id
    }

    #[inline]
    pub fn background(&self) -> Color {
        self.background
    }

    // ── popup ─────────────────────────────────────────────────────────────

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn popup_mut(&mut self) -> Option<&mut Popup> {
        self.popup.as_mut()
    }

    pub fn popup_open(&self) -> bool {
        self.popup.as_ref().is_some_and(Popup::is_open)
    }

    pub fn set_popup_open(&mut self, open: bool) {
        if let Some(p) = self.popup.as_mut() {
            p.open = open;
        }
    }

    // ── transitions ───────────────────────────────────────────────────────

    pub fn request(&mut self, id: SceneId) {
        self.next = Some(id);
    }

    #[inline]
    pub fn next_scene(&self) -> Option<&SceneId> {
        self.next.as_ref()
    }

    pub(crate) fn take_next(&mut self) -> Option<SceneId> {
        self.next.take()
    }

    /// Requests the redirect of any activated clickable, base widgets first.
    pub fn follow_redirects(&mut self) {
        let from_popup = self.popup.as_ref().filter(|p| p.open).and_then(|p| p.widgets.activated_redirect());
        if let Some(id) = self.widgets.activated_redirect().or(from_popup) {
            self.request(id);
        }
    }

    // ── per-frame fan-out ─────────────────────────────────────────────────

    /// Sends `event` to the base widgets not covered by an open popup, then
    /// to the popup's widgets.
    pub fn dispatch(&mut self, event: &UiEvent, ctx: &EventCtx) {
        let popup = self.popup.as_mut().filter(|p| p.open);
        match popup {
            Some(p) => {
                self.widgets.dispatch(event, ctx, |w| p.covers(w));
                p.widgets.dispatch(event, ctx, |_| false);
            }
            None => self.widgets.dispatch(event, ctx, |_| false),
        }
    }

    pub fn update(&mut self, ctx: &LayoutCtx<'_>) {
        self.widgets.update(ctx);
        if let Some(p) = self.popup.as_mut().filter(|p| p.open) {
            p.widgets.update(ctx);
        }
    }

    pub fn draw_background(&self, painter: &mut Painter<'_>, bounds: Rect) {
        painter.fill_rect(bounds, self.background);
        if let Some(image) = self.background_image {
            painter.image(image, bounds);
        }
    }

    pub fn draw_widgets(&self, painter: &mut Painter<'_>) {
        self.widgets.draw(painter);
        if let Some(p) = self.popup.as_ref().filter(|p| p.open) {
            if let Some((rect, color)) = p.backdrop {
                painter.fill_rounded_rect(rect, 0.0, color, None);
            }
            p.widgets.draw(painter);
        }
    }
}

// ── Scene ─────────────────────────────────────────────────────────────────

/// One full screen: a [`SceneCore`] plus the screen's own behaviour.
///
/// Frame protocol, driven by [`crate::Navigator`]: `process_input`, `update`,
/// `render`. Overriding is optional; the defaults fan out to the core.
pub trait Scene: AsAny {
    fn core(&self) -> &SceneCore;
    fn core_mut(&mut self) -> &mut SceneCore;

    fn id(&self) -> &SceneId {
        self.core().id()
    }

    /// Reacts to `event` after every widget has handled it.
    ///
    /// Activation flags set by this event are visible here. The default
    /// follows button redirects.
    fn on_event(&mut self, _event: &UiEvent, _ctx: &mut SceneCtx<'_>) {
        self.core_mut().follow_redirects();
    }

    /// Stops at the first event that requests a transition; the rest of the
    /// batch is dropped with the old scene.
    fn process_input(&mut self, events: &[UiEvent], ctx: &mut SceneCtx<'_>) {
        for event in events {
            ctx.pointer.advance(event);
            let pointer = ctx.pointer;
            self.core_mut().dispatch(event, &pointer);
            self.on_event(event, ctx);
            if self.core().next_scene().is_some() {
                break;
            }
        }
    }

    fn update(&mut self, ctx: &LayoutCtx<'_>) {
        self.core_mut().update(ctx);
    }

    fn render(&self, painter: &mut Painter<'_>, bounds: Rect) {
        let core = self.core();
        core.draw_background(painter, bounds);
        core.draw_widgets(painter);
    }

    /// While `true`, input is queued instead of processed.
    fn is_blocking(&self) -> bool {
        false
    }

    /// Handles a message posted by another scene.
    fn receive(&mut self, _message: &crate::navigator::SceneMessage) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidgetConfig;
    use crate::style::Style;
    use crate::testing::click;
    use crate::widgets::{Button, TextField};

    fn button(x: f32, redirect: Option<&'static str>) -> Button {
        let mut cfg = WidgetConfig::new(x, 0.0, 50.0, 50.0).text("b");
        if let Some(r) = redirect {
            cfg = cfg.redirect(SceneId::new(r));
        }
        Button::new(&cfg, Style::default()).unwrap()
    }

    // ── ids ───────────────────────────────────────────────────────────────

    #[test]
    fn borrowed_and_owned_ids_compare_equal() {
        assert_eq!(SceneId::new("library"), SceneId::owned("library"));
        assert_eq!(SceneId::new("library").to_string(), "library");
    }

    // ── widget set ────────────────────────────────────────────────────────

    #[test]
    fn keys_recover_concrete_widgets() {
        let mut set = WidgetSet::new();
        let b = set.add(button(0.0, None));
        let f = set.add(
            TextField::new(&WidgetConfig::new(0.0, 100.0, 100.0, 50.0).text("Name"), Style::default()).unwrap(),
        );
        assert_eq!(set[b].label(), "b");
        set[f].set_placeholder("Other");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn activated_redirect_skips_plain_buttons() {
        let mut set = WidgetSet::new();
        let plain = set.add(button(0.0, None));
        set.add(button(100.0, Some("library")));
        set.dispatch(&click(10.0, 10.0), &EventCtx::default(), |_| false);
        assert!(set.clicked(plain, &click(10.0, 10.0)));
        assert_eq!(set.activated_redirect(), None);

        set.dispatch(&click(110.0, 10.0), &EventCtx::default(), |_| false);
        assert_eq!(set.activated_redirect(), Some(SceneId::new("library")));
    }

    // ── popup ─────────────────────────────────────────────────────────────

    #[test]
    fn open_popup_shields_covered_widgets_only() {
        let mut core = SceneCore::new(SceneId::new("viewer"))
            .with_popup(Popup::new(Rect::new(100.0, 0.0, 400.0, 400.0)));
        let covered = core.widgets.add(button(150.0, None));
        let outside = core.widgets.add(button(0.0, Some("main_menu")));
        let inner = core.popup_mut().unwrap().widgets.add(button(160.0, None));
        core.set_popup_open(true);

        core.dispatch(&click(160.0, 10.0), &EventCtx::default());
        assert!(!core.widgets[covered].activated());
        assert!(core.popup().unwrap().widgets[inner].activated());

        core.dispatch(&click(10.0, 10.0), &EventCtx::default());
        assert!(core.widgets[outside].activated());
        core.follow_redirects();
        assert_eq!(core.next_scene(), Some(&SceneId::new("main_menu")));
    }

    #[test]
    fn closed_popup_receives_nothing() {
        let mut core = SceneCore::new(SceneId::new("viewer"))
            .with_popup(Popup::new(Rect::new(100.0, 0.0, 400.0, 400.0)));
        let covered = core.widgets.add(button(150.0, None));
        let inner = core.popup_mut().unwrap().widgets.add(button(160.0, None));
        core.dispatch(&click(160.0, 10.0), &EventCtx::default());
        assert!(core.widgets[covered].activated());
        assert!(!core.popup().unwrap().widgets[inner].activated());
    }
}
