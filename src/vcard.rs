//! vCard 3.0 contact cards.

use std::fmt;

use crate::roster::Record;

/// The fixed set of fields written into every label's QR code.
///
/// Phone, address and formatted name are always blank; their lines are still
/// emitted so every card has the same shape.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactCard {
    pub name: String,
    pub organization: String,
    pub title: String,
    pub email: String,
}

impl ContactCard {
    /// Number of lines in a serialized card, `BEGIN` and `END` included.
    pub const FIELD_LINES: usize = 10;

    pub fn from_record(record: &Record) -> Self {
        Self {
            name: record.display_name(),
            organization: record.organization.clone().unwrap_or_default(),
            title: record.title.clone().unwrap_or_default(),
            email: record.email.clone(),
        }
    }

    /// Serializes the card, lines joined by `\n` with no trailing newline.
    pub fn to_vcard(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ContactCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BEGIN:VCARD\n\
             VERSION:3.0\n\
             N:{}\n\
             FN:\n\
             ORG:{}\n\
             TITLE:{}\n\
             TEL;TYPE=WORK,VOICE:\n\
             ADR;TYPE=HOME:;;\n\
             EMAIL:{}\n\
             END:VCARD",
            escape_value(&self.name),
            escape_value(&self.organization),
            escape_value(&self.title),
            escape_value(&self.email)
        )
    }
}

/// Escapes a property value as vCard 3.0 text, keeping it on one line.
fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\r' => {
                chars.next_if_eq(&'\n');
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Reads the fields this crate writes back out of vCard text.
///
/// Unknown properties are ignored and missing ones stay empty.
pub fn parse_vcard(text: &str) -> ContactCard {
    let mut card = ContactCard::default();
    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        // Property parameters follow the name after ';'
        let name = key.split(';').next().unwrap_or_default();
        match name {
            "N" => card.name = unescape_value(value),
            "ORG" => card.organization = unescape_value(value),
            "TITLE" => card.title = unescape_value(value),
            "EMAIL" => card.email = unescape_value(value),
            _ => {}
        }
    }
    card
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{parse_roster, RosterKind};

    fn attendee() -> Record {
        Record {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            title: None,
            organization: Some("DevOpsDays 2024".into()),
        }
    }

    #[test]
    fn test_attendee_card() {
        let card = ContactCard::from_record(&attendee()).to_vcard();
        assert_eq!(
            card,
            "BEGIN:VCARD\nVERSION:3.0\nN:Ada Lovelace\nFN:\nORG:DevOpsDays 2024\nTITLE:\n\
             TEL;TYPE=WORK,VOICE:\nADR;TYPE=HOME:;;\nEMAIL:ada@example.com\nEND:VCARD"
        );
    }

    #[test]
    fn test_organizer_card_has_title_and_no_org() {
        let record = Record {
            title: Some("Host".into()),
            organization: None,
            ..attendee()
        };
        let card = ContactCard::from_record(&record).to_vcard();
        assert!(card.contains("\nORG:\n"));
        assert!(card.contains("\nTITLE:Host\n"));
    }

    #[test]
    fn test_line_count_is_fixed() {
        let blank = Record {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            title: None,
            organization: None,
        };
        for record in [attendee(), blank] {
            let card = ContactCard::from_record(&record).to_vcard();
            assert_eq!(card.split('\n').count(), ContactCard::FIELD_LINES);
        }
    }

    #[test]
    fn test_deterministic() {
        let a = ContactCard::from_record(&attendee()).to_vcard();
        let b = ContactCard::from_record(&attendee()).to_vcard();
        assert_eq!(a, b);
    }

    #[test]
    fn test_multiline_field_stays_on_one_line() {
        let text = "first,last,email\n\"Ada\nEMAIL:evil@x.org\",Lovelace,ada@example.com\n";
        let records = parse_roster(text, RosterKind::Attendees, "DevOpsDays 2024").unwrap();
        let card = ContactCard::from_record(&records[0]);
        let vcard = card.to_vcard();

        assert_eq!(vcard.split('\n').count(), ContactCard::FIELD_LINES);
        assert!(vcard.contains("\nN:Ada\\nEMAIL:evil@x.org Lovelace\n"));
        assert_eq!(vcard.matches("EMAIL:").count(), 2);
        assert_eq!(parse_vcard(&vcard).email, "ada@example.com");
        assert_eq!(parse_vcard(&vcard), card);
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let card = ContactCard {
            name: "Doe; Jo".into(),
            organization: "R&D, Inc.".into(),
            title: "C:\\Admin\r\nLead".into(),
            email: "jo@example.com".into(),
        };
        let vcard = card.to_vcard();
        assert!(vcard.contains("\nN:Doe\\; Jo\n"));
        assert!(vcard.contains("\nORG:R&D\\, Inc.\n"));
        assert!(vcard.contains("\nTITLE:C:\\\\Admin\\nLead\n"));
        assert_eq!(vcard.lines().count(), ContactCard::FIELD_LINES);

        let back = parse_vcard(&vcard);
        assert_eq!(back.title, "C:\\Admin\nLead");
        assert_eq!(back.name, card.name);
        assert_eq!(back.organization, card.organization);
    }

    #[test]
    fn test_parse_reads_back_fields() {
        let card = ContactCard::from_record(&attendee());
        assert_eq!(parse_vcard(&card.to_vcard()), card);
    }
}
