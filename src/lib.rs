//! # qilabel
//!
//! Turns a CSV roster into a PDF of Avery 5164 name labels, each carrying the person's name
//! and a QR code with their contact card.
//!
//! The pipeline is linear: read the roster, build a vCard per record, encode it as a QR
//! image, place name and code into a 2 × 3 label grid, paginate every six records, and write
//! the PDF.
//!
//! ## Example
//!
//! Encode a contact card and render the QR code in memory:
//!
//! ```rust
//! use qilabel::render::{generate_image, QrStyle};
//! use qilabel::roster::Record;
//! use qilabel::vcard::ContactCard;
//!
//! let record = Record {
//!     first_name: "Ada".into(),
//!     last_name: "Lovelace".into(),
//!     email: "ada@example.com".into(),
//!     title: None,
//!     organization: Some("DevOpsDays 2024".into()),
//! };
//! let card = ContactCard::from_record(&record).to_vcard();
//! let img = generate_image(&card, &QrStyle::default()).unwrap();
//! assert!(img.width() > 0);
//! ```
//!
//! ## Modules
//!
//! - [`roster`]: reading the CSV roster.
//! - [`vcard`]: contact card text.
//! - [`qrcode`]: QR Code Model 2 encoder.
//! - [`render`]: QR symbols as images.
//! - [`layout`]: label grid geometry and pagination.
//! - [`font`], [`pdf`]: font metrics and PDF output.
//! - [`sheet`]: the whole pipeline.

pub mod config;
pub mod error;
pub mod font;
pub mod layout;
pub mod pdf;
pub mod qrcode;
pub mod render;
pub mod roster;
pub mod sheet;
pub mod vcard;

pub use error::{Error, Result};
