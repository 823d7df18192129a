use ocrtunes_engine::coords::Rect;
use serde::Deserialize;

use crate::error::BuildError;
use crate::scene::SceneId;

/// Construction record shared by every widget type.
///
/// Each widget reads the fields it understands. When loaded from data, unknown
/// keys are rejected.
///
/// ```rust,ignore
/// let cfg = WidgetConfig::new(825.0, 330.0, 225.0, 50.0)
///     .text("Username")
///     .editable(true)
///     .max_length(22);
/// let field = TextField::new(&cfg, Style::default())?;
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WidgetConfig {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Label for buttons, initial text for fields.
    pub text: String,
    /// Empty-state text for fields and dropdowns. Fields fall back to `text`.
    pub placeholder: Option<String>,
    pub editable: bool,
    /// Whether the widget paints its background shape.
    pub background: bool,
    pub centred: bool,
    pub max_length: Option<usize>,
    pub redirect: Option<SceneId>,
    pub font_size: Option<f32>,
    pub radius: Option<f32>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            text: String::new(),
            placeholder: None,
            editable: false,
            background: true,
            centred: true,
            max_length: None,
            redirect: None,
            font_size: None,
            radius: None,
        }
    }
}

impl WidgetConfig {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height, ..Self::default() }
    }

    pub fn text(mut self, t: impl Into<String>) -> Self {
        self.text = t.into();
        self
    }

    pub fn placeholder(mut self, t: impl Into<String>) -> Self {
        self.placeholder = Some(t.into());
        self
    }

    pub fn editable(mut self, v: bool) -> Self {
        self.editable = v;
        self
    }

    pub fn background(mut self, v: bool) -> Self {
        self.background = v;
        self
    }

    pub fn centred(mut self, v: bool) -> Self {
        self.centred = v;
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn redirect(mut self, id: SceneId) -> Self {
        self.redirect = Some(id);
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn radius(mut self, r: f32) -> Self {
        self.radius = Some(r);
        self
    }

    /// The configured bounds, validated.
    pub fn rect(&self) -> Result<Rect, BuildError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(self.width) || !valid(self.height) || !self.x.is_finite() || !self.y.is_finite() {
            return Err(BuildError::InvalidSize { width: self.width, height: self.height });
        }
        Ok(Rect::new(self.x, self.y, self.width, self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let cfg = WidgetConfig::new(1.0, 2.0, 3.0, 4.0)
            .text("Log In")
            .redirect(SceneId::new("library"))
            .background(false);
        assert_eq!(cfg.rect().unwrap(), Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(cfg.redirect, Some(SceneId::new("library")));
        assert!(!cfg.background);
        assert!(cfg.centred);
    }

    #[test]
    fn zero_size_is_rejected() {
        let err = WidgetConfig::new(0.0, 0.0, 0.0, 10.0).rect().unwrap_err();
        assert!(matches!(err, BuildError::InvalidSize { .. }));
    }

    #[test]
    fn loads_from_json_with_defaults() {
        let cfg: WidgetConfig = serde_json::from_str(
            r#"{ "x": 825, "y": 330, "width": 225, "height": 50, "text": "Username",
                 "editable": true, "max_length": 22, "redirect": "library" }"#,
        )
        .unwrap();
        assert_eq!(cfg.max_length, Some(22));
        assert_eq!(cfg.redirect, Some(SceneId::new("library")));
        assert!(cfg.background);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res: Result<WidgetConfig, _> =
            serde_json::from_str(r#"{ "x": 1, "y": 1, "width": 1, "height": 1, "colour": "red" }"#);
        assert!(res.is_err());
    }
}
