//! The roster → label sheet pipeline.

use tracing::{debug, info, info_span};

use crate::config::Config;
use crate::error::Result;
use crate::font::LabelFont;
use crate::layout::paginate;
use crate::pdf::{Label, LabelDocument};
use crate::render::{generate_image, QrStyle};
use crate::roster::{load_roster, Record};
use crate::vcard::ContactCard;

/// What a finished run produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub records: usize,
    pub pages: usize,
}

/// Builds the name and QR image for every record, in roster order.
///
/// Fails on the first record whose card does not fit in a QR code.
pub fn build_labels(records: &[Record], style: &QrStyle) -> Result<Vec<Label>> {
    records
        .iter()
        .map(|record| -> Result<Label> {
            let card = ContactCard::from_record(record).to_vcard();
            debug!(name = %record.display_name(), bytes = card.len(), "encoding contact card");
            Ok(Label {
                name: record.display_name(),
                code: generate_image(&card, style)?,
            })
        })
        .collect()
}

/// The configured font, or Helvetica-Bold when none is set.
pub fn load_font(config: &Config) -> Result<LabelFont> {
    match &config.font {
        Some(path) => LabelFont::load(path),
        None => Ok(LabelFont::helvetica_bold()),
    }
}

/// Lays the records out six to a page.
pub fn compose(records: &[Record], config: &Config, font: LabelFont) -> Result<LabelDocument> {
    let labels = build_labels(records, &config.qr)?;
    let mut doc = LabelDocument::new(config.grid, font, config.font_size);
    for (number, page) in paginate(&labels, &config.grid).into_iter().enumerate() {
        let _span = info_span!("page", number = number + 1).entered();
        doc.add_page(page)?;
        debug!(labels = page.len(), "page composed");
    }
    Ok(doc)
}

/// Reads the configured roster.
pub fn load_records(config: &Config) -> Result<Vec<Record>> {
    load_roster(&config.input, config.mode.roster_kind(), &config.organization)
}

/// Composes every page for `records` and writes the PDF.
///
/// The output file is only created once all pages have been composed.
pub fn write_sheet(records: &[Record], config: &Config) -> Result<Summary> {
    let font = load_font(config)?;
    let doc = compose(records, config, font)?;
    let summary = Summary {
        records: records.len(),
        pages: doc.page_count(),
    };
    doc.save(&config.output)?;
    info!(records = summary.records, pages = summary.pages, "label sheet generated");
    Ok(summary)
}

/// Reads the roster and writes its label sheet.
pub fn generate(config: &Config) -> Result<Summary> {
    let records = load_records(config)?;
    write_sheet(&records, config)
}
