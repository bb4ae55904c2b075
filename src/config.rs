//! Command line arguments and the run configuration built from them.

use std::path::PathBuf;

use clap::Parser;

use crate::layout::LabelGrid;
use crate::render::QrStyle;
use crate::roster::RosterKind;

pub const DEFAULT_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";
pub const DEFAULT_FONT_SIZE: f32 = 22.0;
pub const DEFAULT_ORGANIZATION: &str = "DevOpsDays 2024";

/// Which roster to print.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Organizers,
    Attendees,
}

impl Mode {
    /// `orga` selects organizers; any other word means attendees.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "orga" {
            Mode::Organizers
        } else {
            Mode::Attendees
        }
    }

    pub fn roster_kind(self) -> RosterKind {
        match self {
            Mode::Organizers => RosterKind::Organizers,
            Mode::Attendees => RosterKind::Attendees,
        }
    }

    pub fn default_input(self) -> PathBuf {
        match self {
            Mode::Organizers => PathBuf::from("organizers.csv"),
            Mode::Attendees => PathBuf::from("attendees.csv"),
        }
    }

    pub fn default_output(self) -> PathBuf {
        match self {
            Mode::Organizers => PathBuf::from("orga.pdf"),
            Mode::Attendees => PathBuf::from("attendees.pdf"),
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "qilabel",
    version,
    about = "Print Avery 5164 name labels with vCard QR codes from a CSV roster"
)]
pub struct Args {
    /// `orga` for organizers.csv, anything else for attendees.csv
    #[arg(value_name = "orga|attendees")]
    pub mode: String,

    /// Roster to read instead of the mode's default
    #[arg(short, long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// PDF to write instead of the mode's default
    #[arg(short, long, value_name = "PDF")]
    pub output: Option<PathBuf>,

    /// TrueType font embedded for the names
    #[arg(long, env = "QILABEL_FONT", default_value = DEFAULT_FONT)]
    pub font: PathBuf,

    /// Use the viewer's Helvetica-Bold instead of embedding a font
    #[arg(long)]
    pub builtin_font: bool,

    /// Name size in points
    #[arg(long, default_value_t = DEFAULT_FONT_SIZE)]
    pub font_size: f32,

    /// Organization written into attendee cards
    #[arg(long, default_value = DEFAULT_ORGANIZATION)]
    pub org: String,
}

/// Everything one run needs.
#[derive(Clone, Debug)]
pub struct Config {
    pub mode: Mode,
    pub input: PathBuf,
    pub output: PathBuf,
    /// `None` selects the built-in Helvetica-Bold.
    pub font: Option<PathBuf>,
    pub font_size: f32,
    pub organization: String,
    pub qr: QrStyle,
    pub grid: LabelGrid,
}

impl Config {
    /// Defaults for `mode`, matching a bare `qilabel <mode>` invocation.
    pub fn for_mode(mode: Mode) -> Self {
        Self {
            mode,
            input: mode.default_input(),
            output: mode.default_output(),
            font: Some(PathBuf::from(DEFAULT_FONT)),
            font_size: DEFAULT_FONT_SIZE,
            organization: DEFAULT_ORGANIZATION.to_string(),
            qr: QrStyle::default(),
            grid: LabelGrid::avery_5164(),
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let mode = Mode::from_arg(&args.mode);
        let defaults = Config::for_mode(mode);
        Self {
            input: args.input.unwrap_or(defaults.input),
            output: args.output.unwrap_or(defaults.output),
            font: if args.builtin_font { None } else { Some(args.font) },
            font_size: args.font_size,
            organization: args.org,
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_arg() {
        assert_eq!(Mode::from_arg("orga"), Mode::Organizers);
        assert_eq!(Mode::from_arg("attendees"), Mode::Attendees);
        assert_eq!(Mode::from_arg("anything"), Mode::Attendees);
        assert_eq!(Mode::from_arg("ORGA"), Mode::Attendees);
    }

    #[test]
    fn test_defaults_follow_mode() {
        let config = Config::from(Args::parse_from(["qilabel", "orga"]));
        assert_eq!(config.input, PathBuf::from("organizers.csv"));
        assert_eq!(config.output, PathBuf::from("orga.pdf"));
        assert_eq!(config.font_size, 22.0);

        let config = Config::from(Args::parse_from(["qilabel", "whatever"]));
        assert_eq!(config.mode, Mode::Attendees);
        assert_eq!(config.input, PathBuf::from("attendees.csv"));
        assert_eq!(config.output, PathBuf::from("attendees.pdf"));
        assert_eq!(config.organization, DEFAULT_ORGANIZATION);
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "qilabel",
            "orga",
            "--input",
            "staff.csv",
            "-o",
            "staff.pdf",
            "--builtin-font",
            "--font-size",
            "18",
        ]);
        let config = Config::from(args);
        assert_eq!(config.input, PathBuf::from("staff.csv"));
        assert_eq!(config.output, PathBuf::from("staff.pdf"));
        assert_eq!(config.font, None);
        assert_eq!(config.font_size, 18.0);
    }

    #[test]
    fn test_mode_is_required() {
        assert!(Args::try_parse_from(["qilabel"]).is_err());
    }
}
