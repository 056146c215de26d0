//! PDF document assembly
//!
//! Badges arrive as encoded JPEG images with a page index and a physical
//! rectangle. Pages are created lazily the first time they are referenced,
//! so every page up to the highest referenced one exists in the output even
//! when it holds no badge.

use crate::constants::mm_to_pt;
use crate::layout::Rect;
use crate::marks::{MarkBounds, generate_crop_marks, generate_watermark, unencodable_chars};
use crate::types::{NametagError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Resource name of the watermark font
const WATERMARK_FONT: &str = "F1";

#[derive(Default)]
struct PageContent {
    ops: Vec<String>,
    xobjects: Dictionary,
    badges: Vec<MarkBounds>,
}

/// Builds the output document one badge at a time
pub struct DocumentAssembler {
    doc: Document,
    pages_id: ObjectId,
    page_width_pt: f32,
    page_height_pt: f32,
    pages: Vec<PageContent>,
    crop_marks: bool,
    watermark: Option<String>,
    images_placed: usize,
}

impl DocumentAssembler {
    pub fn new(page_width_mm: f32, page_height_mm: f32) -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_width_pt: mm_to_pt(page_width_mm),
            page_height_pt: mm_to_pt(page_height_mm),
            pages: Vec::new(),
            crop_marks: false,
            watermark: None,
            images_placed: 0,
        }
    }

    pub fn with_crop_marks(mut self, enabled: bool) -> Self {
        self.crop_marks = enabled;
        self
    }

    /// Watermark drawn in Helvetica. Characters it cannot show print as `?`.
    pub fn with_watermark(mut self, text: Option<String>) -> Self {
        self.watermark = text.filter(|t| !t.trim().is_empty());
        if let Some(text) = &self.watermark {
            let missing = unencodable_chars(text);
            if missing > 0 {
                log::warn!(
                    "Watermark '{}' has {} characters outside Latin-1; they will print as '?'",
                    text,
                    missing
                );
            }
        }
        self
    }

    /// Pages created so far
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Badges placed so far
    pub fn images_placed(&self) -> usize {
        self.images_placed
    }

    /// Make sure at least `count` pages exist.
    pub fn ensure_pages(&mut self, count: usize) {
        while self.pages.len() < count {
            self.pages.push(PageContent::default());
        }
    }

    /// Place an encoded JPEG on a page.
    ///
    /// `rect` is in millimeters from the top-left corner of the page.
    pub fn place_jpeg(
        &mut self,
        page_index: usize,
        jpeg: Vec<u8>,
        pixel_width: u32,
        pixel_height: u32,
        rect: &Rect,
    ) -> Result<()> {
        if jpeg.is_empty() || pixel_width == 0 || pixel_height == 0 {
            return Err(NametagError::Assembly(format!(
                "Badge image for page {} is empty",
                page_index + 1
            )));
        }

        self.ensure_pages(page_index + 1);

        let image = Stream::new(
            Dictionary::from_iter(vec![
                ("Type", Object::Name(b"XObject".to_vec())),
                ("Subtype", Object::Name(b"Image".to_vec())),
                ("Width", Object::Integer(pixel_width as i64)),
                ("Height", Object::Integer(pixel_height as i64)),
                ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
                ("BitsPerComponent", Object::Integer(8)),
                ("Filter", Object::Name(b"DCTDecode".to_vec())),
            ]),
            jpeg,
        )
        .with_compression(false);
        let image_id = self.doc.add_object(image);

        let name = format!("Im{}", self.images_placed);
        self.images_placed += 1;

        let bounds = MarkBounds {
            x: mm_to_pt(rect.x),
            y: self.page_height_pt - mm_to_pt(rect.bottom()),
            width: mm_to_pt(rect.width),
            height: mm_to_pt(rect.height),
        };

        let page = &mut self.pages[page_index];
        page.xobjects.set(name.as_bytes(), Object::Reference(image_id));
        page.ops.push(format!(
            "q {} 0 0 {} {} {} cm /{} Do Q\n",
            bounds.width, bounds.height, bounds.x, bounds.y, name
        ));
        page.badges.push(bounds);
        Ok(())
    }

    /// Build the page tree and return the finished document.
    pub fn finish(mut self) -> Result<Document> {
        if self.pages.is_empty() {
            return Err(NametagError::Assembly("Document has no pages".to_string()));
        }

        let font_id = self.watermark.as_ref().map(|_| {
            self.doc.add_object(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Font".to_vec())),
                ("Subtype", Object::Name(b"Type1".to_vec())),
                ("BaseFont", Object::Name(b"Helvetica".to_vec())),
                ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
            ]))
        });

        let pages = std::mem::take(&mut self.pages);
        let mut page_refs = Vec::with_capacity(pages.len());
        for page in pages {
            let page_id = self.render_page(page, font_id);
            page_refs.push(Object::Reference(page_id));
        }

        let count = page_refs.len() as i64;
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(page_refs)),
            ("Count", Object::Integer(count)),
        ]);
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.doc.trailer.set("Root", catalog_id);

        log::debug!(
            "Assembled {} pages with {} badges",
            count,
            self.images_placed
        );
        Ok(self.doc)
    }

    /// Finish and serialize to PDF bytes.
    pub fn finish_bytes(self) -> Result<Vec<u8>> {
        let mut doc = self.finish()?;
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        if bytes.is_empty() {
            return Err(NametagError::Assembly(
                "Serialized document is empty".to_string(),
            ));
        }
        Ok(bytes)
    }

    fn render_page(&mut self, page: PageContent, font_id: Option<ObjectId>) -> ObjectId {
        let mut content_ops = page.ops;

        if self.crop_marks {
            content_ops.push(generate_crop_marks(&page.badges));
        }

        let mut resources = Dictionary::new();
        if let (Some(text), Some(font_id)) = (&self.watermark, font_id) {
            content_ops.push(generate_watermark(
                text,
                self.page_width_pt,
                self.page_height_pt,
                WATERMARK_FONT,
            ));
            let mut fonts = Dictionary::new();
            fonts.set(WATERMARK_FONT, Object::Reference(font_id));
            resources.set("Font", Object::Dictionary(fonts));
        }
        resources.set("XObject", Object::Dictionary(page.xobjects));

        let content = content_ops.join("");
        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let page_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(self.pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(self.page_width_pt),
                    Object::Real(self.page_height_pt),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Dictionary(resources)),
        ]);
        self.doc.add_object(page_dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderedNametag;

    fn jpeg() -> (Vec<u8>, u32, u32) {
        let badge = RenderedNametag::placeholder(40, 24);
        (badge.encode_jpeg().unwrap(), 40, 24)
    }

    #[test]
    fn test_empty_document_fails() {
        let assembler = DocumentAssembler::new(210.0, 297.0);
        assert!(matches!(
            assembler.finish(),
            Err(NametagError::Assembly(_))
        ));
    }

    #[test]
    fn test_pages_created_lazily_with_gaps() {
        let mut assembler = DocumentAssembler::new(210.0, 297.0);
        let (bytes, w, h) = jpeg();
        assembler
            .place_jpeg(2, bytes, w, h, &Rect::new(10.0, 10.0, 90.0, 55.0))
            .unwrap();
        assert_eq!(assembler.page_count(), 3);

        let doc = assembler.finish().unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_placement_flips_y() {
        let mut assembler = DocumentAssembler::new(210.0, 297.0);
        let (bytes, w, h) = jpeg();
        assembler
            .place_jpeg(0, bytes, w, h, &Rect::new(0.0, 0.0, 25.4, 25.4))
            .unwrap();

        let page = &assembler.pages[0];
        let bounds = page.badges[0];
        assert!((bounds.width - 72.0).abs() < 1e-3);
        // Top-left badge sits at the top of the page in PDF space
        assert!((bounds.top() - mm_to_pt(297.0)).abs() < 1e-2);
        assert!(page.ops[0].ends_with("/Im0 Do Q\n"));
    }

    #[test]
    fn test_rejects_empty_image() {
        let mut assembler = DocumentAssembler::new(210.0, 297.0);
        let result = assembler.place_jpeg(0, Vec::new(), 10, 10, &Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(matches!(result, Err(NametagError::Assembly(_))));
    }

    #[test]
    fn test_serialized_document_reloads() {
        let mut assembler = DocumentAssembler::new(215.9, 279.4)
            .with_crop_marks(true)
            .with_watermark(Some("SAMPLE".to_string()));
        let (bytes, w, h) = jpeg();
        assembler
            .place_jpeg(0, bytes.clone(), w, h, &Rect::new(12.0, 12.0, 90.0, 55.0))
            .unwrap();
        assembler
            .place_jpeg(0, bytes, w, h, &Rect::new(110.0, 12.0, 90.0, 55.0))
            .unwrap();

        let pdf = assembler.finish_bytes().unwrap();
        let doc = Document::load_mem(&pdf).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let page_id = *pages.values().next().unwrap();
        let content = String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).to_string();
        assert_eq!(content.matches(" Do Q").count(), 2);
        assert!(content.contains("(SAMPLE) Tj"));
        assert!(content.contains(" l S"));
    }
}
