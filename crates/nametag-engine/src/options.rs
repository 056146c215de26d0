use crate::constants::{
    DEFAULT_GRID_GAP_MM, DEFAULT_MAX_ENTRIES, MAX_BLANK_ENTRIES, MAX_ENTRIES_LIMIT,
};
use crate::model::*;
use crate::types::*;
use std::collections::BTreeMap;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Paper and Grid
// =============================================================================

/// Supported output paper sizes (portrait)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
}

impl PaperSize {
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::Letter => (215.9, 279.4),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PaperSize::A4 => "A4",
            PaperSize::Letter => "Letter",
        }
    }
}

/// Fixed column/row presets for grid sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridPreset {
    #[default]
    TwoByTwo,
    TwoByThree,
    ThreeByThree,
    TwoByFour,
}

impl GridPreset {
    /// Columns and rows
    pub fn dimensions(self) -> (usize, usize) {
        match self {
            GridPreset::TwoByTwo => (2, 2),
            GridPreset::TwoByThree => (2, 3),
            GridPreset::ThreeByThree => (3, 3),
            GridPreset::TwoByFour => (2, 4),
        }
    }

    pub fn per_page(self) -> usize {
        let (cols, rows) = self.dimensions();
        cols * rows
    }

    pub fn label(self) -> &'static str {
        match self {
            GridPreset::TwoByTwo => "2x2",
            GridPreset::TwoByThree => "2x3",
            GridPreset::ThreeByThree => "3x3",
            GridPreset::TwoByFour => "2x4",
        }
    }

    /// Parse a `"2x3"` style label, falling back to 2x2 for anything else.
    pub fn parse_lenient(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }
}

impl FromStr for GridPreset {
    type Err = NametagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "2x2" => Ok(GridPreset::TwoByTwo),
            "2x3" => Ok(GridPreset::TwoByThree),
            "3x3" => Ok(GridPreset::ThreeByThree),
            "2x4" => Ok(GridPreset::TwoByFour),
            other => Err(NametagError::Config(format!("Unknown grid layout '{other}'"))),
        }
    }
}

/// How badge size is determined
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
pub enum SizingMode {
    /// Grid comes from a preset; badge size fits the template aspect into each cell
    Grid { preset: GridPreset, gap_mm: f32 },
    /// Badge size is given; the grid is derived from it
    Fixed { width_mm: f32, height_mm: f32 },
}

impl Default for SizingMode {
    fn default() -> Self {
        SizingMode::Grid {
            preset: GridPreset::TwoByTwo,
            gap_mm: DEFAULT_GRID_GAP_MM,
        }
    }
}

/// Extra dataless badges appended after the roster
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BlankFill {
    /// Badges rendered with the default template
    Count(usize),
    /// Badges per template id
    PerTemplate(BTreeMap<String, usize>),
}

impl Default for BlankFill {
    fn default() -> Self {
        BlankFill::Count(0)
    }
}

impl BlankFill {
    /// Configured blanks, saturating instead of overflowing.
    pub fn total(&self) -> usize {
        match self {
            BlankFill::Count(n) => *n,
            BlankFill::PerTemplate(counts) => {
                counts.values().fold(0usize, |sum, n| sum.saturating_add(*n))
            }
        }
    }

    /// Blanks that will actually be queued: per-template counts for ids
    /// missing from `templates` are dropped.
    pub fn resolved_total(&self, templates: &[Template]) -> usize {
        if templates.is_empty() {
            return 0;
        }
        match self {
            BlankFill::Count(n) => *n,
            BlankFill::PerTemplate(counts) => counts
                .iter()
                .filter(|(id, _)| templates.iter().any(|t| &t.id == *id))
                .fold(0usize, |sum, (_, n)| sum.saturating_add(*n)),
        }
    }
}

// =============================================================================
// Export Configuration
// =============================================================================

/// Paper, sizing and output options for one run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExportConfig {
    pub paper: PaperSize,
    pub margin_mm: f32,
    pub sizing: SizingMode,
    pub blank_fill: BlankFill,
    /// Requested print resolution. Rasters use a fixed reference width; placement is always in mm.
    pub dpi: u32,
    /// Draw trim marks around every badge
    pub crop_marks: bool,
    /// Text repeated across every page
    pub watermark: Option<String>,
    /// Largest roster accepted for one run
    pub max_entries: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            paper: PaperSize::A4,
            margin_mm: 12.0,
            sizing: SizingMode::default(),
            blank_fill: BlankFill::default(),
            dpi: 300,
            crop_marks: false,
            watermark: None,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl ExportConfig {
    /// Roster ceiling after clamping to the absolute limit
    pub fn effective_max_entries(&self) -> usize {
        self.max_entries.clamp(1, MAX_ENTRIES_LIMIT)
    }

    pub fn validate(&self) -> Result<()> {
        let (paper_w, paper_h) = self.paper.dimensions_mm();
        if !self.margin_mm.is_finite() || self.margin_mm < 0.0 {
            return Err(NametagError::Config("Margin must be non-negative".to_string()));
        }
        if self.margin_mm * 2.0 >= paper_w.min(paper_h) {
            return Err(NametagError::Config(format!(
                "Margin of {}mm leaves no printable area on {}",
                self.margin_mm,
                self.paper.name()
            )));
        }
        if self.dpi == 0 {
            return Err(NametagError::Config("DPI must be positive".to_string()));
        }

        match self.sizing {
            SizingMode::Grid { gap_mm, .. } => {
                if !gap_mm.is_finite() || gap_mm < 0.0 {
                    return Err(NametagError::Config(
                        "Grid gap must be non-negative".to_string(),
                    ));
                }
            }
            SizingMode::Fixed {
                width_mm,
                height_mm,
            } => {
                if !(width_mm.is_finite() && height_mm.is_finite())
                    || width_mm <= 0.0
                    || height_mm <= 0.0
                {
                    return Err(NametagError::Config(
                        "Fixed badge size must be positive".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

// =============================================================================
// Project Settings
// =============================================================================

/// Editor state that drives generation, minus templates and roster
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProjectSettings {
    pub text_fields: Vec<TextFieldSpec>,
    /// Used when `text_fields` is empty
    pub legacy_text: TextConfig,
    /// Column whose value selects a template or header color
    pub template_column: Option<String>,
    pub role_mapping: RoleMapping,
    pub role_colors: RoleColorMap,
    /// Template used when nothing else applies
    pub selected_template_id: Option<String>,
    pub default_template: DefaultTemplateConfig,
    pub export: ExportConfig,
}

impl ProjectSettings {
    /// Load settings from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let settings = serde_json::from_slice(&bytes)
            .map_err(|e| NametagError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(settings)
    }

    /// Save settings to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| NametagError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

// =============================================================================
// Generation Request
// =============================================================================

/// Immutable input snapshot for one run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenerationRequest {
    pub templates: Vec<Template>,
    pub roster: Vec<RosterEntry>,
    /// Roster column names, in display order
    pub columns: Vec<String>,
    pub settings: ProjectSettings,
}

impl GenerationRequest {
    pub fn new(templates: Vec<Template>, roster: Vec<RosterEntry>, settings: ProjectSettings) -> Self {
        let columns = roster
            .first()
            .map(|entry| entry.fields.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default();
        Self {
            templates,
            roster,
            columns,
            settings,
        }
    }

    pub fn export(&self) -> &ExportConfig {
        &self.settings.export
    }

    pub fn find_template(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// The selected template, or the first one when the selection is unknown.
    pub fn default_template(&self) -> Option<&Template> {
        self.settings
            .selected_template_id
            .as_deref()
            .and_then(|id| self.find_template(id))
            .or_else(|| self.templates.first())
    }

    /// More than one non-built-in template is available.
    pub fn is_multi_template(&self) -> bool {
        self.templates.iter().filter(|t| !t.is_builtin()).count() > 1
    }

    /// Check everything that would stop a run before it starts.
    pub fn validate(&self) -> Result<()> {
        if self.templates.is_empty() {
            return Err(NametagError::NoTemplate);
        }

        let max = self.settings.export.effective_max_entries();
        if self.roster.len() > max {
            return Err(NametagError::TooManyEntries {
                count: self.roster.len(),
                max,
            });
        }

        let blanks = self.settings.export.blank_fill.total();
        if blanks > MAX_BLANK_ENTRIES {
            return Err(NametagError::Config(format!(
                "Too many blank badges: {} (maximum {})",
                blanks, MAX_BLANK_ENTRIES
            )));
        }

        if self.roster.is_empty()
            && self.settings.export.blank_fill.resolved_total(&self.templates) == 0
        {
            return Err(NametagError::EmptyRoster);
        }

        self.settings.export.validate()
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::{Deserialize, Serialize};

    impl Serialize for GridPreset {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_str(self.label())
        }
    }

    impl<'de> Deserialize<'de> for GridPreset {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            s.parse()
                .map_err(|_| serde::de::Error::custom(format!("Unknown grid layout '{s}'")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_preset_parsing() {
        assert_eq!("2x3".parse::<GridPreset>().unwrap(), GridPreset::TwoByThree);
        assert_eq!(" 3X3 ".parse::<GridPreset>().unwrap(), GridPreset::ThreeByThree);
        assert!("4x4".parse::<GridPreset>().is_err());
        assert_eq!(GridPreset::parse_lenient("4x4"), GridPreset::TwoByTwo);
    }

    #[test]
    fn test_blank_fill_total() {
        assert_eq!(BlankFill::Count(3).total(), 3);
        let mut counts = BTreeMap::new();
        counts.insert("a".to_string(), 2);
        counts.insert("b".to_string(), 5);
        assert_eq!(BlankFill::PerTemplate(counts).total(), 7);
    }

    #[test]
    fn test_margin_validation() {
        let config = ExportConfig {
            margin_mm: 105.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(NametagError::Config(_))));
    }

    #[test]
    fn test_fixed_size_validation() {
        let config = ExportConfig {
            sizing: SizingMode::Fixed {
                width_mm: 0.0,
                height_mm: 55.0,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_entries_clamped() {
        let config = ExportConfig {
            max_entries: 50_000,
            ..Default::default()
        };
        assert_eq!(config.effective_max_entries(), MAX_ENTRIES_LIMIT);
    }

    #[test]
    fn test_request_validation_order() {
        let request = GenerationRequest::default();
        assert!(matches!(request.validate(), Err(NametagError::NoTemplate)));

        let request = GenerationRequest::new(vec![Template::builtin()], Vec::new(), Default::default());
        assert!(matches!(request.validate(), Err(NametagError::EmptyRoster)));
    }

    #[test]
    fn test_blank_fill_total_saturates() {
        let mut counts = BTreeMap::new();
        counts.insert("a".to_string(), usize::MAX);
        counts.insert("b".to_string(), 5);
        assert_eq!(BlankFill::PerTemplate(counts).total(), usize::MAX);
    }

    #[test]
    fn test_resolved_total_skips_unknown_templates() {
        let templates = vec![Template::builtin(), Template::image("a", "a.png", vec![0u8], 10, 10)];
        let mut counts = BTreeMap::new();
        counts.insert("a".to_string(), 2);
        counts.insert("gone".to_string(), 5);
        let fill = BlankFill::PerTemplate(counts);
        assert_eq!(fill.total(), 7);
        assert_eq!(fill.resolved_total(&templates), 2);
        assert_eq!(BlankFill::Count(3).resolved_total(&templates), 3);
        assert_eq!(BlankFill::Count(3).resolved_total(&[]), 0);
    }

    #[test]
    fn test_blank_only_request_is_valid() {
        let mut settings = ProjectSettings::default();
        settings.export.blank_fill = BlankFill::Count(4);
        let request = GenerationRequest::new(vec![Template::builtin()], Vec::new(), settings);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_default_template_falls_back_to_first() {
        let mut settings = ProjectSettings::default();
        settings.selected_template_id = Some("missing".to_string());
        let request = GenerationRequest::new(
            vec![Template::builtin(), Template::image("a", "a.png", vec![0u8], 10, 10)],
            Vec::new(),
            settings,
        );
        assert_eq!(request.default_template().unwrap().id, Template::builtin().id);
    }
}
