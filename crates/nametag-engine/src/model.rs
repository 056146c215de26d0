//! Input data model: templates, roster entries and text styling
//!
//! Everything here is authored before a run starts and is treated as
//! read-only by the engine.

use crate::constants::DEFAULT_TEMPLATE_ID;
use crate::types::Rgb;
use std::collections::BTreeMap;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Templates
// =============================================================================

/// Where a template's pixels come from
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateSource {
    /// Drawn procedurally by the rasterizer
    BuiltIn,
    /// Encoded raster image (PNG, JPEG, ...)
    Image(Arc<[u8]>),
}

/// A visual background badges are rendered against
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub source: TemplateSource,
    /// Intrinsic width in pixels
    pub width_px: u32,
    /// Intrinsic height in pixels
    pub height_px: u32,
    pub role: Option<String>,
}

impl Template {
    /// The procedural template every project starts with.
    pub fn builtin() -> Self {
        Self {
            id: DEFAULT_TEMPLATE_ID.to_string(),
            name: "Default nametag".to_string(),
            source: TemplateSource::BuiltIn,
            width_px: 400,
            height_px: 240,
            role: None,
        }
    }

    /// An uploaded image template with already-known pixel dimensions.
    pub fn image(
        id: impl Into<String>,
        name: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
        width_px: u32,
        height_px: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source: TemplateSource::Image(bytes.into()),
            width_px,
            height_px,
            role: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.source, TemplateSource::BuiltIn)
    }

    /// Width divided by height. Degenerate dimensions are treated as square.
    pub fn aspect_ratio(&self) -> f32 {
        if self.width_px == 0 || self.height_px == 0 {
            1.0
        } else {
            self.width_px as f32 / self.height_px as f32
        }
    }
}

/// Make sure a template list has something to render with.
///
/// Inserts the built-in template when the list is empty and returns the id
/// that should serve as the default.
pub fn ensure_default_template(templates: &mut Vec<Template>) -> String {
    if templates.is_empty() {
        templates.push(Template::builtin());
    }
    templates[0].id.clone()
}

// =============================================================================
// Roster
// =============================================================================

/// One person on the roster
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RosterEntry {
    pub id: String,
    /// Column name to value, in roster column order
    pub fields: Vec<(String, String)>,
    /// Direct template override
    #[cfg_attr(feature = "serde", serde(default))]
    pub template_id: Option<String>,
}

impl RosterEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((column.into(), value.into()));
        self
    }

    pub fn with_template(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    /// Synthetic dataless entry used to pad extra badges.
    pub fn blank(index: usize, template_id: Option<String>) -> Self {
        Self {
            id: format!("blank-{index}"),
            fields: Vec::new(),
            template_id,
        }
    }

    /// Value for a column. Missing columns read as empty.
    pub fn value(&self, column: &str) -> &str {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// Value of the first column, if any.
    pub fn first_value(&self) -> Option<&str> {
        self.fields.first().map(|(_, value)| value.as_str())
    }
}

// =============================================================================
// Text Styling
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FontWeight {
    Normal,
    #[default]
    Bold,
}

impl FontWeight {
    /// CSS-style numeric weight: 700 and above is bold.
    pub fn from_numeric(weight: u16) -> Self {
        if weight >= 700 {
            FontWeight::Bold
        } else {
            FontWeight::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextStyle {
    pub font_family: String,
    /// Font size in reference-width pixels
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub color: Rgb,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Pretendard".to_string(),
            font_size: 36.0,
            font_weight: FontWeight::Bold,
            color: Rgb::BLACK,
        }
    }
}

/// Center anchor of a text line, as percentages of badge width and height
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextPosition {
    pub x: f32,
    pub y: f32,
}

impl Default for TextPosition {
    fn default() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

/// One visible line of text on a badge
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextFieldSpec {
    pub id: String,
    /// Roster column the text is read from
    pub column: String,
    pub position: TextPosition,
    pub style: TextStyle,
}

impl TextFieldSpec {
    pub fn new(id: impl Into<String>, column: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            id: id.into(),
            column: column.into(),
            position: TextPosition { x, y },
            style: TextStyle::default(),
        }
    }
}

/// Single-line text placement used when no text fields are configured.
///
/// The badge shows the entry's first column value.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextConfig {
    pub position: TextPosition,
    pub style: TextStyle,
}

// =============================================================================
// Roles
// =============================================================================

/// Role value to template id. See [`crate::constants::NO_ROLE_KEY`].
pub type RoleMapping = BTreeMap<String, String>;

/// Role value to header color for the built-in template.
pub type RoleColorMap = BTreeMap<String, Rgb>;

// =============================================================================
// Built-in Template Design
// =============================================================================

/// Labels and proportions of the procedurally drawn template
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DefaultTemplateConfig {
    pub header_text: String,
    pub footer_text: String,
    /// Header band height as a percentage of the card height
    pub header_height_pct: f32,
    pub header_color: Rgb,
}

impl Default for DefaultTemplateConfig {
    fn default() -> Self {
        Self {
            header_text: "NAME TAG".to_string(),
            footer_text: "Company / Organization".to_string(),
            header_height_pct: 22.0,
            header_color: Rgb::new(59, 130, 246),
        }
    }
}
