//! PDF output for token sheets.

use super::label::{encode_win_ansi, fit_label, text_width};
use super::RenderOptions;
use crate::error::{Error, Result};
use crate::layout::GridGeometry;
use crate::model::{Page, PlacedToken, TokenImage, TokenSheet};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

const FONT_NAME: &str = "F1";

/// Image XObjects shared across pages, keyed by token image key.
#[derive(Default)]
struct ImageRegistry {
    entries: HashMap<String, (String, ObjectId)>,
}

impl ImageRegistry {
    fn get_or_embed(&mut self, doc: &mut Document, image: &TokenImage) -> Result<(String, ObjectId)> {
        if let Some(entry) = self.entries.get(&image.key) {
            return Ok(entry.clone());
        }

        let id = doc.add_object(image_stream(image)?);
        let name = format!("Im{}", self.entries.len() + 1);
        self.entries.insert(image.key.clone(), (name.clone(), id));
        Ok((name, id))
    }
}

/// Render a token sheet to PDF bytes.
///
/// Each distinct image is embedded once and referenced from every page that
/// uses it.
pub fn to_pdf(sheet: &TokenSheet, options: &RenderOptions) -> Result<Vec<u8>> {
    if sheet.is_empty() {
        return Err(Error::Render("token sheet has no pages".to_string()));
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut images = ImageRegistry::default();
    let mut kids: Vec<Object> = Vec::with_capacity(sheet.pages.len());

    for page in &sheet.pages {
        let page_id = add_page(&mut doc, &mut images, page, &sheet.geometry, options, pages_id, font_id)?;
        kids.push(page_id.into());
    }

    doc.set_object(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
        },
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let metadata = &sheet.metadata;
    let title = options.title.as_deref().unwrap_or(&metadata.title);
    let created = metadata.created.format("D:%Y%m%d%H%M%SZ").to_string();
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(title),
        "Creator" => Object::string_literal(metadata.creator.as_str()),
        "Producer" => Object::string_literal(metadata.creator.as_str()),
        "CreationDate" => Object::string_literal(created),
    });
    doc.trailer.set("Info", info_id);

    if options.compress {
        doc.compress();
    }

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;

    log::info!(
        "rendered {} page(s), {} token(s), {} embedded image(s), {} bytes",
        sheet.page_count(),
        sheet.token_count(),
        images.entries.len(),
        buffer.len()
    );

    Ok(buffer)
}

/// Render a token sheet and write it to `path`.
///
/// The PDF is written next to the destination first and moved into place, so
/// a failure never leaves a truncated file behind.
pub fn write_pdf<P: AsRef<Path>>(sheet: &TokenSheet, path: P, options: &RenderOptions) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_pdf(sheet, options)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tokens.pdf".to_string());
    let staging = path.with_file_name(format!(".{}.partial", file_name));

    let staged = fs::write(&staging, &bytes).and_then(|()| fs::rename(&staging, path));
    if let Err(source) = staged {
        let _ = fs::remove_file(&staging);
        return Err(Error::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    log::debug!("wrote {}", path.display());
    Ok(())
}

fn add_page(
    doc: &mut Document,
    images: &mut ImageRegistry,
    page: &Page,
    geometry: &GridGeometry,
    options: &RenderOptions,
    pages_id: ObjectId,
    font_id: ObjectId,
) -> Result<ObjectId> {
    let (width, height) = page.dimensions();
    let mut operations = Vec::new();
    let mut xobjects = Dictionary::new();

    for cell in &page.cells {
        let (name, id) = images.get_or_embed(doc, &cell.image)?;
        xobjects.set(name.clone(), id);
        draw_image(&mut operations, cell, &name, geometry, height);

        if let Some(label) = &cell.name {
            draw_label(&mut operations, cell, label, geometry, options, height);
        }
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_NAME => font_id,
        },
        "XObject" => xobjects,
    });

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
        "Contents" => content_id,
        "Resources" => resources_id,
    }))
}

/// Scale the image to fit the token square, centered, keeping its aspect ratio.
fn draw_image(ops: &mut Vec<Operation>, cell: &PlacedToken, name: &str, geometry: &GridGeometry, page_height: f32) {
    let size = geometry.token_size;
    let (w, h) = (cell.image.width.max(1) as f32, cell.image.height.max(1) as f32);
    let scale = size / w.max(h);
    let (draw_w, draw_h) = (w * scale, h * scale);
    let left = cell.x + (size - draw_w) / 2.0;
    // PDF y axis points up
    let bottom = page_height - (cell.y + (size - draw_h) / 2.0 + draw_h);

    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new(
        "cm",
        vec![draw_w.into(), 0.into(), 0.into(), draw_h.into(), left.into(), bottom.into()],
    ));
    ops.push(Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]));
    ops.push(Operation::new("Q", vec![]));
}

/// Center the label in the band below the token image.
fn draw_label(
    ops: &mut Vec<Operation>,
    cell: &PlacedToken,
    label: &str,
    geometry: &GridGeometry,
    options: &RenderOptions,
    page_height: f32,
) {
    let font_size = options.label_font_size;
    let text = fit_label(label, font_size, geometry.cell_width);
    let left = cell.x + (geometry.cell_width - text_width(&text, font_size)) / 2.0;
    let band_middle = cell.y + geometry.token_size + geometry.label_height() / 2.0;
    let baseline = page_height - band_middle - font_size * 0.35;

    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![FONT_NAME.into(), font_size.into()]));
    ops.push(Operation::new("Td", vec![left.into(), baseline.into()]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(encode_win_ansi(&text), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn image_stream(image: &TokenImage) -> Result<Stream> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(image.rgb_bytes())?;
    let data = encoder.finish()?;

    let mut stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width as i64,
            "Height" => image.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        },
        data,
    );
    stream.allows_compression = false;
    Ok(stream)
}
