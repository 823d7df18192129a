use ocrtunes_engine::coords::Rect;

use crate::config::WidgetConfig;
use crate::error::BuildError;
use crate::event::{EventCtx, UiEvent};
use crate::layout;
use crate::painter::Painter;
use crate::widget::{LayoutCtx, Scrollable, Widget};
use crate::widgets::item_list::{ListStyle, ROW_GAP};
use crate::widgets::playlist_card::PlaylistCard;
use crate::widgets::track::ScrollArea;

/// Playlist cards wrapped into `columns` per row, scrolled vertically.
///
/// Same slider mechanics as [`super::ScrollableList`]; card `i` sits in column
/// `i % columns`, row `i / columns`. A press on a visible card selects it.
#[derive(Debug)]
pub struct GridSlide {
    area: ScrollArea,
    cards: Vec<PlaylistCard>,
    visible: Vec<bool>,
    selected: Option<usize>,
    style: ListStyle,
}

impl GridSlide {
    /// `config` gives the first card's rect.
    pub fn new(
        config: &WidgetConfig,
        cards: Vec<PlaylistCard>,
        columns: usize,
        max_rows: usize,
        style: ListStyle,
    ) -> Result<Self, BuildError> {
        let area = ScrollArea::new(config.rect()?, ROW_GAP, max_rows, columns)?;
        let mut grid = Self { area, cards, visible: Vec::new(), selected: None, style };
        grid.relayout();
        Ok(grid)
    }

    #[inline]
    pub fn cards(&self) -> &[PlaylistCard] {
        &self.cards
    }

    /// Replaces the cards, resizing the thumb and dropping any selection.
    pub fn set_cards(&mut self, cards: Vec<PlaylistCard>) {
        self.cards = cards;
        self.selected = None;
        self.relayout();
    }

    pub fn selected(&self) -> Option<&PlaylistCard> {
        self.selected.and_then(|i| self.cards.get(i))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    #[inline]
    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.get(index).copied().unwrap_or(false)
    }

    fn relayout(&mut self) {
        let columns = self.area.columns();
        self.area.set_rows(layout::grid_rows(self.cards.len(), columns));
        let (first, gap, offset) = (self.area.first(), self.area.gap(), self.area.pixel_offset());
        self.visible.clear();
        for (i, card) in self.cards.iter_mut().enumerate() {
            let rect = layout::grid_cell(first, gap, columns, i, offset);
            card.set_rect(rect);
            self.visible.push(self.area.is_visible(rect));
        }
    }
}

impl Widget for GridSlide {
    fn rect(&self) -> Rect {
        self.area.bounds()
    }

    fn handle_event(&mut self, event: &UiEvent, ctx: &EventCtx) {
        if let Some(pos) = event.primary_press() {
            let hit = (0..self.cards.len()).find(|&i| self.visible[i] && self.cards[i].rect().contains(pos));
            if hit.is_some() {
                self.selected = hit;
            }
        }
        self.area.track_mut().handle_event(event, ctx);
    }

    fn update(&mut self, _ctx: &LayoutCtx<'_>) {
        self.relayout();
    }

    fn draw(&self, painter: &mut Painter<'_>) {
        self.area.track().draw(painter, self.style.slider, self.style.dragging);
        for (card, visible) in self.cards.iter().zip(&self.visible) {
            if *visible {
                card.draw(painter);
            }
        }
        self.area.draw_guards(painter, self.style.guard);
    }

    fn is_active(&self) -> bool {
        self.area.track().is_dragging()
    }

    fn as_scrollable_mut(&mut self) -> Option<&mut dyn Scrollable> {
        Some(self)
    }
}

impl Scrollable for GridSlide {
    fn offset(&self) -> f32 {
        self.area.track().offset()
    }

    fn thumb(&self) -> Rect {
        self.area.track().thumb()
    }

    fn reset_scroll(&mut self) {
        self.area.track_mut().reset();
        self.relayout();
    }
}
