use ocrtunes_engine::coords::Rect;

use crate::config::WidgetConfig;
use crate::error::BuildError;
use crate::event::{EventCtx, UiEvent};
use crate::layout;
use crate::painter::Painter;
use crate::style::Style;
use crate::widget::{LayoutCtx, Widget};

/// A header showing the current choice plus a menu of the other options.
///
/// A press on the header toggles the menu. While open, the unselected options
/// are listed below the header in lexicographic order; pressing one makes it
/// the selection and closes the menu. Presses elsewhere leave the menu open.
#[derive(Debug)]
pub struct DropDown {
    rect: Rect,
    options: Vec<String>,
    placeholder: Option<String>,
    selected: String,
    open: bool,
    style: Style,
}

impl DropDown {
    /// `config.placeholder` is shown until an option is chosen; `config.text`
    /// preselects an option.
    pub fn new<S: AsRef<str>>(config: &WidgetConfig, options: &[S], style: Style) -> Result<Self, BuildError> {
        let rect = config.rect()?;
        let mut list: Vec<String> = Vec::with_capacity(options.len());
        for opt in options.iter().map(AsRef::as_ref) {
            if list.iter().any(|o| o == opt) {
                return Err(BuildError::DuplicateOption(opt.to_owned()));
            }
            list.push(opt.to_owned());
        }

        let placeholder = config.placeholder.clone();
        let selected = if !config.text.is_empty() {
            let known = list.contains(&config.text) || placeholder.as_deref() == Some(config.text.as_str());
            if !known {
                return Err(BuildError::UnknownSelection(config.text.clone()));
            }
            config.text.clone()
        } else {
            placeholder.clone().or_else(|| list.first().cloned()).ok_or(BuildError::NoOptions)?
        };

        let mut style = style;
        if let Some(size) = config.font_size {
            style.font_size = size;
        }
        if let Some(r) = config.radius {
            style.radius = r;
        }
        Ok(Self { rect, options: list, placeholder, selected, open: false, style })
    }

    #[inline]
    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// The chosen option, or `None` while the placeholder is showing.
    pub fn value(&self) -> Option<&str> {
        (self.placeholder.as_deref() != Some(self.selected.as_str())).then_some(self.selected.as_str())
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Options shown in the open menu: everything but the selection, sorted.
    pub fn listed(&self) -> Vec<&str> {
        let mut listed: Vec<&str> = self.options.iter().map(String::as_str).filter(|o| *o != self.selected).collect();
        listed.sort_unstable();
        listed
    }

    /// Closes the menu and returns to the placeholder (or the first option).
    pub fn reset(&mut self) {
        self.open = false;
        if let Some(p) = self.placeholder.as_ref().or(self.options.first()) {
            self.selected = p.clone();
        }
    }

    /// Menu rows paired with their rects.
    fn option_rows(&self) -> impl Iterator<Item = (&str, Rect)> {
        self.listed().into_iter().enumerate().map(|(i, o)| (o, layout::stacked_row(self.rect, i)))
    }
}

impl Widget for DropDown {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn handle_event(&mut self, event: &UiEvent, _ctx: &EventCtx) {
        let Some(pos) = event.primary_press() else { return; };
        if self.rect.contains(pos) {
            self.open = !self.open;
            return;
        }
        if !self.open {
            return;
        }
        let picked = self.option_rows().find(|(_, r)| r.contains(pos)).map(|(o, _)| o.to_owned());
        if let Some(option) = picked {
            log::debug!("dropdown: {} -> {option}", self.selected);
            self.selected = option;
            self.open = false;
        }
    }

    fn update(&mut self, _ctx: &LayoutCtx<'_>) {}

    fn draw(&self, painter: &mut Painter<'_>) {
        let s = &self.style;
        let header = if self.open { s.active } else { s.background };
        painter.fill_rounded_rect(self.rect, s.radius, header, None);
        let size = painter.measure(&self.selected, s.font, s.font_size);
        painter.text(&self.selected, s.font, s.font_size, s.text, layout::centred(self.rect, size));

        if !self.open {
            return;
        }
        painter.overlay(|p| {
            for (option, rect) in self.option_rows() {
                p.fill_rounded_rect(rect, s.radius, s.background, None);
                let size = p.measure(option, s.font, s.font_size);
                p.text(option, s.font, s.font_size, s.text, layout::centred(rect, size));
            }
        });
    }

    fn is_active(&self) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::click;
    use proptest::prelude::*;

    fn genre(placeholder: Option<&str>) -> DropDown {
        let mut cfg = WidgetConfig::new(0.0, 0.0, 100.0, 40.0);
        if let Some(p) = placeholder {
            cfg = cfg.placeholder(p);
        }
        DropDown::new(&cfg, &["Rock", "RNB", "Pop", "Rap"], Style::default()).unwrap()
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn starts_on_placeholder_or_first_option() {
        assert_eq!(genre(Some("Genre")).selected(), "Genre");
        assert_eq!(genre(Some("Genre")).value(), None);
        assert_eq!(genre(None).selected(), "Rock");
        assert_eq!(genre(None).value(), Some("Rock"));
    }

    #[test]
    fn rejects_bad_option_sets() {
        let cfg = WidgetConfig::new(0.0, 0.0, 10.0, 10.0);
        let dup = DropDown::new(&cfg, &["Pop", "Pop"], Style::default()).unwrap_err();
        assert_eq!(dup, BuildError::DuplicateOption("Pop".into()));
        let none = DropDown::new::<&str>(&cfg, &[], Style::default()).unwrap_err();
        assert_eq!(none, BuildError::NoOptions);
        let unknown = DropDown::new(&cfg.clone().text("Jazz"), &["Pop"], Style::default()).unwrap_err();
        assert_eq!(unknown, BuildError::UnknownSelection("Jazz".into()));
    }

    // ── menu ──────────────────────────────────────────────────────────────

    #[test]
    fn open_menu_lists_other_options_sorted() {
        let d = DropDown::new(
            &WidgetConfig::new(0.0, 0.0, 100.0, 40.0).text("Pop"),
            &["Rock", "Pop"],
            Style::default(),
        )
        .unwrap();
        assert_eq!(d.listed(), vec!["Rock"]);
        assert_eq!(genre(Some("Genre")).listed(), vec!["Pop", "RNB", "Rap", "Rock"]);
    }

    #[test]
    fn header_press_toggles_and_option_press_selects() {
        let mut d = genre(Some("Genre"));
        d.handle_event(&click(10.0, 10.0), &EventCtx::default());
        assert!(d.is_open());
        // second row below the header is "RNB"
        d.handle_event(&click(10.0, 90.0), &EventCtx::default());
        assert!(!d.is_open());
        assert_eq!(d.selected(), "RNB");
        assert_eq!(d.listed(), vec!["Pop", "Rap", "Rock"]);
    }

    #[test]
    fn closed_menu_ignores_option_area() {
        let mut d = genre(Some("Genre"));
        d.handle_event(&click(10.0, 50.0), &EventCtx::default());
        assert_eq!(d.selected(), "Genre");
    }

    #[test]
    fn press_outside_keeps_menu_open() {
        let mut d = genre(None);
        d.handle_event(&click(10.0, 10.0), &EventCtx::default());
        d.handle_event(&click(500.0, 500.0), &EventCtx::default());
        assert!(d.is_open());
    }

    #[test]
    fn reset_returns_to_placeholder() {
        let mut d = genre(Some("Genre"));
        d.handle_event(&click(10.0, 10.0), &EventCtx::default());
        d.handle_event(&click(10.0, 50.0), &EventCtx::default());
        d.reset();
        assert_eq!(d.selected(), "Genre");
    }

    proptest! {
        #[test]
        fn selection_never_listed(presses in proptest::collection::vec(0usize..6, 0..20)) {
            let mut d = genre(Some("Genre"));
            for row in presses {
                // row 0 is the header, rows 1.. are menu entries
                d.handle_event(&click(10.0, 40.0 * row as f32 + 5.0), &EventCtx::default());
                prop_assert!(!d.listed().contains(&d.selected()));
            }
        }
    }
}
