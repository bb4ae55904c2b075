//! Writing label sheets as PDF.

use std::fs;
use std::path::Path;

use image::GrayImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::{debug, info};

use crate::error::Result;
use crate::font::{encode_winansi, LabelFont};
use crate::layout::{layout_page, LabelGrid, Placement};

/// Resource name of the label font on every page.
const FONT_RESOURCE: &str = "F1";

/// One label's content.
#[derive(Clone, Debug)]
pub struct Label {
    pub name: String,
    pub code: GrayImage,
}

/// A PDF being assembled one page at a time.
///
/// Nothing touches the filesystem until [`LabelDocument::save`], so a failure
/// part way through never leaves a partial file behind.
pub struct LabelDocument {
    doc: Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    page_ids: Vec<ObjectId>,
    grid: LabelGrid,
    font: LabelFont,
    font_size: f32,
}

impl LabelDocument {
    pub fn new(grid: LabelGrid, font: LabelFont, font_size: f32) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = add_font(&mut doc, &font);
        Self {
            doc,
            pages_id,
            font_id,
            page_ids: Vec::new(),
            grid,
            font,
            font_size,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Lays out up to one page of labels. Labels past the grid capacity are
    /// not drawn.
    pub fn add_page(&mut self, labels: &[Label]) -> Result<()> {
        let names: Vec<&str> = labels.iter().map(|l| l.name.as_str()).collect();
        let placements: Vec<Placement> =
            layout_page(&self.grid, &names, |name| self.font.text_width(name, self.font_size));

        let mut operations = Vec::with_capacity(placements.len() * 9 + 2);
        let mut xobjects = Dictionary::new();

        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![Object::Name(FONT_RESOURCE.as_bytes().to_vec()), Object::Real(self.font_size)],
        ));
        for placement in &placements {
            let label = &labels[placement.index];
            debug!(
                page = self.page_ids.len() + 1,
                slot = placement.index,
                name = %label.name,
                "placing label"
            );
            // Absolute position; Td would be relative to the previous name
            operations.push(Operation::new(
                "Tm",
                vec![
                    Object::Integer(1),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(1),
                    Object::Real(placement.name_x),
                    Object::Real(placement.name_y),
                ],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(encode_winansi(&label.name), StringFormat::Literal)],
            ));
        }
        operations.push(Operation::new("ET", vec![]));

        for placement in &placements {
            let label = &labels[placement.index];
            let image_name = format!("Im{}", placement.index);
            let image_id = self.doc.add_object(image_xobject(&label.code));
            xobjects.set(image_name.clone(), image_id);

            let code = placement.code;
            operations.push(Operation::new("q", vec![]));
            operations.push(Operation::new(
                "cm",
                vec![
                    Object::Real(code.width),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(code.height),
                    Object::Real(code.x),
                    Object::Real(code.y),
                ],
            ));
            operations.push(Operation::new("Do", vec![Object::Name(image_name.into_bytes())]));
            operations.push(Operation::new("Q", vec![]));
        }

        let content = Content { operations };
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { FONT_RESOURCE => self.font_id },
                "XObject" => xobjects,
            },
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(self.grid.page_width),
                Object::Real(self.grid.page_height),
            ],
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Finalises the page tree and serialises the document.
    pub fn into_bytes(mut self) -> Result<Vec<u8>> {
        let kids: Vec<Object> = self.page_ids.iter().map(|&id| Object::Reference(id)).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        let info_id = self.doc.add_object(dictionary! {
            "Title" => Object::string_literal("Avery 5164 labels"),
            "Producer" => Object::string_literal(concat!("qilabel ", env!("CARGO_PKG_VERSION"))),
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.trailer.set("Info", info_id);
        self.doc.compress();

        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes)?;
        Ok(bytes)
    }

    /// Writes the finished document to `path`.
    pub fn save(self, path: &Path) -> Result<()> {
        let pages = self.page_count();
        let bytes = self.into_bytes()?;
        fs::write(path, &bytes)?;
        info!(path = %path.display(), pages, bytes = bytes.len(), "wrote PDF");
        Ok(())
    }
}

fn add_font(doc: &mut Document, font: &LabelFont) -> ObjectId {
    let base_font = Object::Name(font.base_name().as_bytes().to_vec());
    let Some(embedded) = font.embedded() else {
        return doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base_font,
            "Encoding" => "WinAnsiEncoding",
        });
    };

    let file_id = doc.add_object(Stream::new(
        dictionary! { "Length1" => embedded.data.len() as i64 },
        embedded.data.clone(),
    ));
    let bbox: Vec<Object> = embedded.bbox.iter().map(|&v| Object::Integer(v.round() as i64)).collect();
    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => base_font.clone(),
        // Nonsymbolic
        "Flags" => 32_i64,
        "FontBBox" => bbox,
        "ItalicAngle" => 0_i64,
        "Ascent" => Object::Integer(embedded.ascent.round() as i64),
        "Descent" => Object::Integer(embedded.descent.round() as i64),
        "CapHeight" => Object::Integer(embedded.cap_height.round() as i64),
        "StemV" => 80_i64,
        "FontFile2" => file_id,
    });
    let widths: Vec<Object> = font.widths().iter().map(|&w| Object::Integer(w.round() as i64)).collect();
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "TrueType",
        "BaseFont" => base_font,
        "FirstChar" => i64::from(font.first_char()),
        "LastChar" => i64::from(font.last_char()),
        "Widths" => widths,
        "FontDescriptor" => descriptor_id,
        "Encoding" => "WinAnsiEncoding",
    })
}

fn image_xobject(img: &GrayImage) -> Stream {
    let (width, height) = img.dimensions();
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8_i64,
        },
        img.as_raw().clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn label(name: &str) -> Label {
        Label {
            name: name.to_string(),
            code: GrayImage::from_pixel(4, 4, Luma([255u8])),
        }
    }

    fn page_count(bytes: &[u8]) -> usize {
        Document::load_mem(bytes).unwrap().get_pages().len()
    }

    #[test]
    fn test_one_page() {
        let mut doc = LabelDocument::new(LabelGrid::avery_5164(), LabelFont::helvetica_bold(), 22.0);
        let labels: Vec<Label> = (0..6).map(|i| label(&format!("Person {i}"))).collect();
        doc.add_page(&labels).unwrap();
        assert_eq!(doc.page_count(), 1);

        let bytes = doc.into_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn test_page_resources() {
        let mut doc = LabelDocument::new(LabelGrid::avery_5164(), LabelFont::helvetica_bold(), 22.0);
        doc.add_page(&[label("Ada Lovelace"), label("Alan Turing")]).unwrap();
        doc.add_page(&[label("Grace Hopper")]).unwrap();
        let bytes = doc.into_bytes().unwrap();

        let mut pdf = Document::load_mem(&bytes).unwrap();
        pdf.decompress();
        let pages = pdf.get_pages();
        assert_eq!(pages.len(), 2);

        let first = *pages.get(&1).unwrap();
        let content = pdf.get_and_decode_page_content(first).unwrap();
        let shown: Vec<&Operation> = content.operations.iter().filter(|op| op.operator == "Tj").collect();
        let drawn = content.operations.iter().filter(|op| op.operator == "Do").count();
        assert_eq!(shown.len(), 2);
        assert_eq!(drawn, 2);
        assert_eq!(shown[0].operands[0].as_str().unwrap(), b"Ada Lovelace");
    }
}
