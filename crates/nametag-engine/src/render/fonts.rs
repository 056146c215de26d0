//! Font registry for badge text
//!
//! Fonts are registered by the caller; the engine never touches the
//! filesystem to find them.

use crate::model::FontWeight;
use crate::types::{NametagError, Result};
use ab_glyph::FontArc;

#[derive(Clone)]
struct FontFace {
    /// Lowercased family name
    family: String,
    weight: FontWeight,
    font: FontArc,
}

/// Family and weight to loaded font
#[derive(Clone, Default)]
pub struct FontBook {
    faces: Vec<FontFace>,
    fallback_family: Option<String>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field(
                "faces",
                &self
                    .faces
                    .iter()
                    .map(|face| (face.family.as_str(), face.weight))
                    .collect::<Vec<_>>(),
            )
            .field("fallback_family", &self.fallback_family)
            .finish()
    }
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a font from raw TrueType/OpenType bytes.
    ///
    /// A later registration for the same family and weight replaces the earlier one.
    pub fn register(&mut self, family: &str, weight: FontWeight, bytes: Vec<u8>) -> Result<()> {
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| NametagError::Config(format!("Invalid font for '{family}': {e}")))?;
        self.register_font(family, weight, font);
        Ok(())
    }

    /// Register an already loaded font.
    pub fn register_font(&mut self, family: &str, weight: FontWeight, font: FontArc) {
        let family = family.trim().to_lowercase();
        self.faces
            .retain(|face| !(face.family == family && face.weight == weight));
        log::debug!("Registered font '{}' ({:?})", family, weight);
        self.faces.push(FontFace {
            family,
            weight,
            font,
        });
    }

    /// Family used when a requested family is not registered.
    ///
    /// Without one, the first registered font serves as the fallback.
    pub fn set_fallback(&mut self, family: &str) {
        self.fallback_family = Some(family.trim().to_lowercase());
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Registered family names, deduplicated, in registration order
    pub fn families(&self) -> Vec<&str> {
        let mut families: Vec<&str> = Vec::new();
        for face in &self.faces {
            if !families.contains(&face.family.as_str()) {
                families.push(&face.family);
            }
        }
        families
    }

    /// Find a font: exact family and weight, then the family at any weight,
    /// then the fallback family, then whatever was registered first.
    pub fn resolve(&self, family: &str, weight: FontWeight) -> Option<&FontArc> {
        let family = family.trim().to_lowercase();
        if let Some(font) = self.lookup(&family, weight) {
            return Some(font);
        }
        if let Some(font) = self
            .fallback_family
            .as_deref()
            .and_then(|fallback| self.lookup(fallback, weight))
        {
            return Some(font);
        }
        self.faces.first().map(|face| &face.font)
    }

    fn lookup(&self, family: &str, weight: FontWeight) -> Option<&FontArc> {
        self.faces
            .iter()
            .find(|face| face.family == family && face.weight == weight)
            .or_else(|| self.faces.iter().find(|face| face.family == family))
            .map(|face| &face.font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_book_resolves_nothing() {
        let book = FontBook::new();
        assert!(book.is_empty());
        assert!(book.resolve("Pretendard", FontWeight::Bold).is_none());
    }

    #[test]
    fn test_invalid_font_bytes() {
        let mut book = FontBook::new();
        let result = book.register("Broken", FontWeight::Normal, vec![0, 1, 2, 3]);
        assert!(matches!(result, Err(NametagError::Config(_))));
        assert!(book.is_empty());
    }

    // Needs a system font; skipped where none is installed.
    #[test]
    fn test_resolution_order() {
        let Ok(bytes) = std::fs::read("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf") else {
            return;
        };
        let mut book = FontBook::new();
        book.register("DejaVu Sans", FontWeight::Normal, bytes.clone())
            .unwrap();
        book.register("Other", FontWeight::Bold, bytes).unwrap();

        assert_eq!(book.len(), 2);
        assert_eq!(book.families(), vec!["dejavu sans", "other"]);
        assert!(book.resolve("dejavu sans", FontWeight::Bold).is_some());
        assert!(book.resolve("Unknown", FontWeight::Normal).is_some());

        book.set_fallback("other");
        assert!(book.resolve("Unknown", FontWeight::Normal).is_some());
    }
}
