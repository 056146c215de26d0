use thiserror::Error;

#[derive(Error, Debug)]
pub enum NametagError {
    #[error("No template available")]
    NoTemplate,
    #[error("Roster is empty and no blank badges were requested")]
    EmptyRoster,
    #[error("Too many roster entries: {count} (maximum {max})")]
    TooManyEntries { count: usize, max: usize },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Document assembly failed: {0}")]
    Assembly(String),
    #[error("Generation cancelled after {completed} badges")]
    Cancelled { completed: usize },
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl NametagError {
    /// True for errors raised before any badge was rendered.
    pub fn is_startup_error(&self) -> bool {
        matches!(
            self,
            NametagError::NoTemplate
                | NametagError::EmptyRoster
                | NametagError::TooManyEntries { .. }
                | NametagError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, NametagError>;

/// Per-badge rasterization failure. Recovered inside a run, never returned from it.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template image could not be decoded: {0}")]
    TemplateDecode(#[from] image::ImageError),
    #[error("Invalid render dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Template {0} has no image data")]
    MissingImage(String),
    #[error("Badge image could not be encoded: {0}")]
    Encode(image::ImageError),
}

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb`.
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let expand = |s: &str| channel(s).map(|v| v * 17);
                Some(Self::new(
                    expand(&hex[0..1])?,
                    expand(&hex[1..2])?,
                    expand(&hex[2..3])?,
                ))
            }
            _ => None,
        }
    }

    /// Parse a color string, falling back to black for anything unrecognized.
    pub fn parse_or_black(value: &str) -> Self {
        Self::parse_hex(value).unwrap_or(Self::BLACK)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, 255)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Rgb {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Rgb::parse_or_black(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_hex() {
        assert_eq!(Rgb::parse_hex("#3b82f6"), Some(Rgb::new(59, 130, 246)));
        assert_eq!(Rgb::parse_hex("#FFFFFF"), Some(Rgb::WHITE));
    }

    #[test]
    fn test_parse_short_hex() {
        assert_eq!(Rgb::parse_hex("#f00"), Some(Rgb::new(255, 0, 0)));
    }

    #[test]
    fn test_invalid_color_falls_back_to_black() {
        assert_eq!(Rgb::parse_hex("red"), None);
        assert_eq!(Rgb::parse_or_black("red"), Rgb::BLACK);
        assert_eq!(Rgb::parse_or_black("#12345"), Rgb::BLACK);
        assert_eq!(Rgb::parse_or_black("#ééé"), Rgb::BLACK);
    }

    #[test]
    fn test_hex_output() {
        assert_eq!(Rgb::new(59, 130, 246).to_hex(), "#3b82f6");
    }

    #[test]
    fn test_startup_errors() {
        assert!(NametagError::NoTemplate.is_startup_error());
        assert!(NametagError::TooManyEntries { count: 301, max: 300 }.is_startup_error());
        assert!(!NametagError::Assembly("empty".into()).is_startup_error());
        assert!(!NametagError::Cancelled { completed: 20 }.is_startup_error());
    }
}
