use ocrtunes_engine::coords::{Rect, Vec2};
use ocrtunes_engine::images::ImageId;

use crate::event::{EventCtx, UiEvent};
use crate::model::PlaylistRecord;
use crate::painter::Painter;
use crate::style::{BLACK, BODY_SIZE, LIGHT_BLUE};
use crate::widget::{LayoutCtx, Widget};
use crate::widgets::text_field::TEXT_INSET;

const CARD_RADIUS: f32 = 25.0;
const THUMBNAIL: f32 = 100.0;
const BOTTOM_MARGIN: f32 = 5.0;

/// Summary card for one saved playlist: thumbnail plus name, song count and
/// total length, bottom-aligned.
///
/// The owning [`super::GridSlide`] positions cards with [`PlaylistCard::set_rect`].
#[derive(Debug, Clone)]
pub struct PlaylistCard {
    rect: Rect,
    name: String,
    song_count: usize,
    minutes: u32,
    image: ImageId,
}

impl PlaylistCard {
    pub fn new(name: impl Into<String>, record: &PlaylistRecord, image: ImageId) -> Self {
        Self {
            rect: Rect::default(),
            name: name.into(),
            song_count: record.songs.len(),
            minutes: record.total_minutes(),
            image,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn song_count(&self) -> usize {
        self.song_count
    }

    #[inline]
    pub fn total_minutes(&self) -> u32 {
        self.minutes
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    /// The info lines, top to bottom.
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Name: {}", self.name),
            format!("Songs: {}", self.song_count),
            format!("Track Length: {} minutes", self.minutes),
        ]
    }
}

impl Widget for PlaylistCard {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn handle_event(&mut self, _event: &UiEvent, _ctx: &EventCtx) {}

    fn update(&mut self, _ctx: &LayoutCtx<'_>) {}

    fn draw(&self, painter: &mut Painter<'_>) {
        painter.fill_rounded_rect(self.rect, CARD_RADIUS, LIGHT_BLUE, None);
        let thumb = Rect::from_origin_size(self.rect.origin + Vec2::new(TEXT_INSET, TEXT_INSET), Vec2::new(THUMBNAIL, THUMBNAIL));
        painter.image(self.image, thumb);

        let lines = self.lines();
        let line_h = painter.measure("", None, BODY_SIZE).y;
        let mut y = self.rect.y() + self.rect.height() - lines.len() as f32 * line_h - BOTTOM_MARGIN;
        for line in &lines {
            painter.text(line, None, BODY_SIZE, BLACK, Vec2::new(self.rect.x() + TEXT_INSET, y));
            y += line_h;
        }
    }
}
