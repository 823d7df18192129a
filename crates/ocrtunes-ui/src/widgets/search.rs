use ocrtunes_engine::coords::{Rect, Vec2};

use crate::config::WidgetConfig;
use crate::error::BuildError;
use crate::event::{EventCtx, UiEvent};
use crate::layout;
use crate::model::Searchable;
use crate::painter::Painter;
use crate::style::{Style, BLACK};
use crate::widget::{Editable, LayoutCtx, Widget};
use crate::widgets::text_field::{TextField, TEXT_INSET};

pub const MAX_RESULTS: usize = 10;

/// A text field that live-filters `reference` and lists matches below itself.
///
/// Matching is a case-insensitive substring test over every field of an
/// entry, in reference order, capped at `max_results`. A press on a listed
/// result selects it; the selection is dropped on the next event once the
/// field is no longer being edited.
#[derive(Debug)]
pub struct SearchOverlay<T> {
    field: TextField,
    reference: Vec<T>,
    max_results: usize,
    results: Vec<usize>,
    selected: Option<T>,
}

impl<T: Searchable> SearchOverlay<T> {
    pub fn new(config: &WidgetConfig, reference: Vec<T>, style: Style) -> Result<Self, BuildError> {
        let mut config = config.clone().editable(true).centred(false);
        if config.text.is_empty() && config.placeholder.is_none() {
            config = config.text("Search");
        }
        Ok(Self {
            field: TextField::new(&config, style)?,
            reference,
            max_results: MAX_RESULTS,
            results: Vec::new(),
            selected: None,
        })
    }

    pub fn with_max_results(mut self, n: usize) -> Self {
        self.max_results = n;
        self
    }

    pub fn set_reference(&mut self, reference: Vec<T>) {
        self.reference = reference;
        self.results.clear();
        self.selected = None;
    }

    #[inline]
    pub fn field(&self) -> &TextField {
        &self.field
    }

    #[inline]
    pub fn selected(&self) -> Option<&T> {
        self.selected.as_ref()
    }

    pub fn take_selected(&mut self) -> Option<T> {
        self.selected.take()
    }

    /// Current matches, in reference order.
    pub fn results(&self) -> impl Iterator<Item = &T> {
        self.results.iter().filter_map(|&i| self.reference.get(i))
    }

    /// Recomputes matches for the current query.
    fn search(&mut self) {
        self.results.clear();
        if !self.field.is_editing() {
            return;
        }
        let query = self.field.text();
        self.results.extend(
            self.reference
                .iter()
                .enumerate()
                .filter(|(_, entry)| entry.matches(query))
                .map(|(i, _)| i)
                .take(self.max_results),
        );
    }

    fn result_rows(&self) -> impl Iterator<Item = (usize, Rect)> + '_ {
        let header = self.field.rect();
        self.results.iter().enumerate().map(move |(row, &i)| (i, layout::stacked_row(header, row)))
    }
}

impl<T: Searchable> Widget for SearchOverlay<T> {
    fn rect(&self) -> Rect {
        self.field.rect()
    }

    fn handle_event(&mut self, event: &UiEvent, ctx: &EventCtx) {
        if !self.field.is_editing() {
            self.selected = None;
        }
        if let Some(pos) = event.primary_press().filter(|_| self.field.is_editing()) {
            let hit = self.result_rows().find(|(_, r)| r.contains(pos)).map(|(i, _)| i);
            if let Some(i) = hit {
                self.selected = self.reference.get(i).cloned();
            }
        }
        self.field.handle_event(event, ctx);
        self.search();
    }

    fn update(&mut self, ctx: &LayoutCtx<'_>) {
        self.field.update(ctx);
        self.search();
    }

    fn draw(&self, painter: &mut Painter<'_>) {
        self.field.draw(painter);
        if !self.field.is_editing() {
            return;
        }
        let s: &Style = self.field.style();
        painter.overlay(|p| {
            for (i, rect) in self.result_rows() {
                let Some(entry) = self.reference.get(i) else { continue; };
                p.fill_rect(rect, s.background);
                p.outline(rect, 1.0, BLACK);
                let fields = entry.fields();
                let label = fields.first().map(String::as_str).unwrap_or_default();
                let size = p.measure(label, s.font, s.font_size);
                let origin = Vec2::new(rect.x() + TEXT_INSET, rect.y() + ((rect.height() - size.y) / 2.0).floor());
                p.text(label, s.font, s.font_size, s.text, origin);
            }
        });
    }

    fn is_active(&self) -> bool {
        self.field.is_editing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Song;
    use crate::testing::{click, key, layout_ctx, typed};
    use ocrtunes_engine::input::Key;
    use ocrtunes_engine::text::FontSystem;

    fn song(name: &str, artist: &str) -> Song {
        Song { name: name.into(), artist: artist.into(), genre: "Pop".into(), length: "3:00".parse().unwrap() }
    }

    fn overlay() -> SearchOverlay<Song> {
        let songs = vec![song("Yellow", "Coldplay"), song("Fix You", "Coldplay"), song("Creep", "Radiohead")];
        SearchOverlay::new(&WidgetConfig::new(250.0, 18.0, 760.0, 60.0), songs, Style::default()).unwrap()
    }

    fn query(s: &mut SearchOverlay<Song>, q: &str) {
        s.handle_event(&click(300.0, 30.0), &EventCtx::default());
        for c in q.chars() {
            s.handle_event(&typed(c), &EventCtx::default());
        }
        s.update(&layout_ctx(&FontSystem::new()));
    }

    fn names(s: &SearchOverlay<Song>) -> Vec<&str> {
        s.results().map(|x| x.name.as_str()).collect()
    }

    // ── matching ──────────────────────────────────────────────────────────

    #[test]
    fn matches_any_field_in_reference_order() {
        let mut s = overlay();
        query(&mut s, "COLD");
        assert_eq!(names(&s), vec!["Yellow", "Fix You"]);
    }

    #[test]
    fn empty_query_lists_everything_up_to_cap() {
        let mut s = overlay().with_max_results(2);
        query(&mut s, "");
        assert_eq!(names(&s), vec!["Yellow", "Fix You"]);
    }

    #[test]
    fn no_results_when_not_editing() {
        let mut s = overlay();
        query(&mut s, "e");
        s.handle_event(&key(Key::Enter), &EventCtx::default());
        assert_eq!(s.results().count(), 0);
        assert_eq!(s.field().text(), "e");
    }

    // ── selection ─────────────────────────────────────────────────────────

    #[test]
    fn pressing_a_result_selects_it() {
        let mut s = overlay();
        query(&mut s, "radio");
        // first result row is directly below the field: y 78..138
        s.handle_event(&click(300.0, 100.0), &EventCtx::default());
        assert_eq!(s.selected().map(|x| x.name.as_str()), Some("Creep"));
        assert!(!s.field().is_editing());
    }

    #[test]
    fn selection_clears_on_next_event_while_closed() {
        let mut s = overlay();
        query(&mut s, "radio");
        s.handle_event(&click(300.0, 100.0), &EventCtx::default());
        s.handle_event(&crate::testing::move_to(0.0, 0.0), &EventCtx::default());
        assert!(s.selected().is_none());
    }

    #[test]
    fn take_selected_consumes() {
        let mut s = overlay();
        query(&mut s, "fix");
        s.handle_event(&click(300.0, 100.0), &EventCtx::default());
        assert_eq!(s.take_selected().map(|x| x.name), Some("Fix You".to_string()));
        assert!(s.selected().is_none());
    }
}
