use std::fs;
use std::path::{Path, PathBuf};

use image::GrayImage;
use lopdf::Document;
use qilabel::config::{Config, Mode, DEFAULT_FONT};
use qilabel::render::{generate_image, QrStyle};
use qilabel::roster::{parse_roster, RosterKind};
use qilabel::sheet::{self, Summary};
use qilabel::vcard::{parse_vcard, ContactCard};
use qilabel::Error;

fn write_roster(dir: &Path, name: &str, header: &str, rows: usize) -> PathBuf {
    let mut text = format!("{header}\n");
    for i in 0..rows {
        text.push_str(&format!("First{i},Last{i},person{i}@example.com,Role {i}\n"));
    }
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

fn config(dir: &Path, mode: Mode, input: PathBuf) -> Config {
    Config {
        input,
        output: dir.join("labels.pdf"),
        font: None,
        ..Config::for_mode(mode)
    }
}

fn pdf_pages(path: &Path) -> usize {
    Document::load(path).unwrap().get_pages().len()
}

fn decode(img: &GrayImage) -> String {
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        img.width() as usize,
        img.height() as usize,
        |x, y| img.get_pixel(x as u32, y as u32)[0],
    );
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1);
    let (_meta, content) = grids[0].decode().unwrap();
    content
}

#[test]
fn six_records_fill_one_page() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_roster(dir.path(), "attendees.csv", "first,last,email", 6);
    let config = config(dir.path(), Mode::Attendees, input);

    let summary = sheet::generate(&config).unwrap();
    assert_eq!(summary, Summary { records: 6, pages: 1 });
    assert_eq!(pdf_pages(&config.output), 1);
}

#[test]
fn seventh_record_starts_a_second_page() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_roster(dir.path(), "attendees.csv", "first,last,email", 7);
    let config = config(dir.path(), Mode::Attendees, input);

    let summary = sheet::generate(&config).unwrap();
    assert_eq!(summary.pages, 2);

    let mut pdf = Document::load(&config.output).unwrap();
    pdf.decompress();
    let pages = pdf.get_pages();
    let images_on = |page: u32| {
        let content = pdf.get_and_decode_page_content(pages[&page]).unwrap();
        content.operations.iter().filter(|op| op.operator == "Do").count()
    };
    assert_eq!(images_on(1), 6);
    assert_eq!(images_on(2), 1);
}

#[test]
fn organizer_roster() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_roster(dir.path(), "organizers.csv", "first,last,email,title", 3);
    let config = config(dir.path(), Mode::Organizers, input);

    let summary = sheet::generate(&config).unwrap();
    assert_eq!(summary, Summary { records: 3, pages: 1 });
}

#[test]
fn missing_roster_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), Mode::Attendees, dir.path().join("attendees.csv"));

    let err = sheet::generate(&config).unwrap_err();
    assert!(matches!(err, Error::MissingInput(_)));
    assert!(!config.output.exists());
}

#[test]
fn oversized_card_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("attendees.csv");
    let long_email = format!("{}@example.com", "x".repeat(3000));
    fs::write(&input, format!("first,last,email\nAda,Lovelace,{long_email}\n")).unwrap();
    let config = config(dir.path(), Mode::Attendees, input);

    let err = sheet::generate(&config).unwrap_err();
    assert!(matches!(err, Error::Encode(_)));
    assert!(!config.output.exists());
}

#[test]
fn qr_code_round_trips_name_and_email() {
    let text = "first,last,email\nAda,Lovelace,ada@example.com\nJosé,Núñez,jose@example.com\n";
    let records = parse_roster(text, RosterKind::Attendees, "DevOpsDays 2024").unwrap();

    for record in &records {
        let card = ContactCard::from_record(record);
        let img = generate_image(&card.to_vcard(), &QrStyle::default()).unwrap();

        let decoded = decode(&img);
        assert_eq!(decoded, card.to_vcard());
        let back = parse_vcard(&decoded);
        assert_eq!(back.name, record.display_name());
        assert_eq!(back.email, record.email);
    }
}

#[test]
fn embeds_system_font_when_present() {
    if !Path::new(DEFAULT_FONT).exists() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let input = write_roster(dir.path(), "attendees.csv", "first,last,email", 2);
    let config = Config {
        font: Some(PathBuf::from(DEFAULT_FONT)),
        ..config(dir.path(), Mode::Attendees, input)
    };

    sheet::generate(&config).unwrap();
    let bytes = fs::read(&config.output).unwrap();
    assert!(bytes.windows(9).any(|w| w == b"FontFile2"));
}

#[test]
fn loaded_records_are_written_in_a_separate_step() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_roster(dir.path(), "attendees.csv", "first,last,email", 8);
    let config = config(dir.path(), Mode::Attendees, input);

    let records = sheet::load_records(&config).unwrap();
    assert_eq!(records.len(), 8);
    assert!(!config.output.exists());

    let summary = sheet::write_sheet(&records, &config).unwrap();
    assert_eq!(summary, Summary { records: 8, pages: 2 });
    assert_eq!(pdf_pages(&config.output), 2);
}

#[test]
fn missing_font_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_roster(dir.path(), "attendees.csv", "first,last,email", 1);
    let config = Config {
        font: Some(dir.path().join("NoSuchFont.ttf")),
        ..config(dir.path(), Mode::Attendees, input)
    };

    let records = sheet::load_records(&config).unwrap();
    let err = sheet::write_sheet(&records, &config).unwrap_err();
    assert!(matches!(err, Error::Font { .. }));
    assert!(!config.output.exists());
}
