//! Error type shared by every stage of the label pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::qrcode::DataTooLong;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The roster file does not exist or has zero bytes.
    #[error("missing csv({})", .0.display())]
    MissingInput(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A data row carries fewer than the three required fields.
    #[error("line {line}: expected at least 3 fields (first,last,email), found {found}")]
    ShortRow { line: u64, found: usize },

    /// The contact card does not fit in a version 40 symbol.
    #[error("QR encoding failed: {0}")]
    Encode(#[from] DataTooLong),

    #[error("Failed to load font {}: {reason}", path.display())]
    Font { path: PathBuf, reason: String },

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
}
