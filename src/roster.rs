//! Loading attendee and organizer rosters.
//!
//! A roster is a comma separated file whose first line is a header. Columns are
//! positional: `first,last,email` for attendees, `first,last,email,title` for
//! organizers.

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Which roster layout a file follows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RosterKind {
    /// `first,last,email,title`; the title column may be missing.
    Organizers,
    /// `first,last,email`; every record gets the event organization.
    Attendees,
}

/// One person from the roster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub title: Option<String>,
    pub organization: Option<String>,
}

impl Record {
    /// Name printed on the label and stored in the card's `N` field.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Reads and parses a roster file.
///
/// # Errors
///
/// [`Error::MissingInput`] if the file does not exist or is empty, otherwise any
/// parse error from [`parse_roster`].
pub fn load_roster(path: &Path, kind: RosterKind, organization: &str) -> Result<Vec<Record>> {
    let empty = match fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(_) => true,
    };
    if empty {
        return Err(Error::MissingInput(path.to_path_buf()));
    }

    let text = fs::read_to_string(path)?;
    let records = parse_roster(&text, kind, organization)?;
    info!(path = %path.display(), count = records.len(), "loaded roster");
    Ok(records)
}

/// Parses roster text, skipping the header line.
///
/// Fields may be quoted; unquoted fields are split on every comma. Blank lines
/// are ignored.
pub fn parse_roster(text: &str, kind: RosterKind, organization: &str) -> Result<Vec<Record>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.trim().as_bytes());

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let line = row.position().map_or(0, |p| p.line());
        if row.len() < 3 {
            return Err(Error::ShortRow { line, found: row.len() });
        }

        let field = |i: usize| row.get(i).unwrap_or_default().to_string();
        let record = match kind {
            RosterKind::Organizers => Record {
                first_name: field(0),
                last_name: field(1),
                email: field(2),
                title: row.get(3).map(str::to_string),
                organization: None,
            },
            RosterKind::Attendees => Record {
                first_name: field(0),
                last_name: field(1),
                email: field(2),
                title: None,
                organization: Some(organization.to_string()),
            },
        };
        debug!(line, name = %record.display_name(), "parsed row");
        records.push(record);
    }

    Ok(records)
}
