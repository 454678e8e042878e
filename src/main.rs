//! # dymoprint CLI
//!
//! Command-line interface for the Dymo LabelManager PnP.
//!
//! ## Usage
//!
//! ```bash
//! # One line of text
//! dymoprint "Hello World"
//!
//! # Two lines, bold, with a frame
//! dymoprint -s b -f Line1 Line2
//!
//! # QR code next to text
//! dymoprint --qr https://example.com Website
//!
//! # Barcode
//! dymoprint -c code128 ABC-123
//!
//! # Write a PNG instead of printing
//! dymoprint --preview label.png "Hello World"
//! ```

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use dymoprint::{
    Capability, Error, HidTransport, JobDriver, LabelJob,
    config::{FontStyle, Preferences},
    job::{Element, JobFailure, Outcome, Output, Stage},
    render::{
        barcode::{Barcode, Symbology},
        dither::Monochrome,
        picture::Picture,
        qr::QrCode,
        text::TextLine,
    },
};

/// dymoprint - Print labels on a Dymo LabelManager PnP
#[derive(Parser, Debug)]
#[command(name = "dymoprint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Text lines; every argument becomes its own line
    text: Vec<String>,

    /// Print a QR code (`-qr` is accepted as well)
    #[arg(long, value_name = "PAYLOAD")]
    qr: Option<String>,

    /// Print a barcode, e.g. `-c code128 ABC-123`
    #[arg(short = 'c', num_args = 2, value_names = ["SYMBOLOGY", "PAYLOAD"])]
    barcode: Option<Vec<String>>,

    /// Print a picture
    #[arg(short, long, value_name = "FILE")]
    picture: Option<PathBuf>,

    /// Draw a frame around the text; repeat for a thicker frame
    #[arg(short = 'f', action = ArgAction::Count)]
    frame: u8,

    /// Font style: r (regular), b (bold), i (italic), n (narrow)
    #[arg(short = 's', value_name = "STYLE", default_value = "r")]
    style: FontStyle,

    /// Font file or `builtin`; overrides -s
    #[arg(short = 'u', value_name = "FONT")]
    user_font: Option<String>,

    /// Blank lines fed after the label (default 112)
    #[arg(short = 'm', value_name = "LINES")]
    margin: Option<usize>,

    /// Use ordered dithering for pictures
    #[arg(long)]
    dither: bool,

    /// Write the label to a PNG file instead of printing
    #[arg(long, value_name = "PNG")]
    preview: Option<PathBuf>,

    /// hidraw device node (found automatically when omitted)
    #[arg(long, value_name = "PATH")]
    device: Option<PathBuf>,

    /// Preferences file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        if let Some(hint) = e.hint() {
            eprintln!();
            eprintln!("{}", hint);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<(), JobFailure> {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    let parse_failure = |error| JobFailure {
        stage: Stage::ParseSpec,
        error,
    };

    let prefs = load_preferences(cli.config.as_deref()).map_err(parse_failure)?;
    let job = build_job(&cli, &prefs).map_err(parse_failure)?;

    let device = cli.device.clone().or_else(|| prefs.device.path.clone());
    let transport = match device {
        Some(path) => HidTransport::new(path, &job.capability),
        None => HidTransport::auto(&job.capability),
    };

    if job.output == Output::Device {
        println!("Printing label...");
    }
    match JobDriver::new(transport).run(job)? {
        Outcome::Printed { columns, .. } => {
            println!("Printed a label of {} columns.", columns);
        }
        Outcome::Previewed { path, columns } => {
            println!("Preview of {} columns written to {}", columns, path.display());
        }
    }
    Ok(())
}

/// Rewrite the single-dash `-qr` spelling to `--qr`.
fn normalize_args<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| if arg == "-qr" { OsString::from("--qr") } else { arg })
        .collect()
}

fn load_preferences(path: Option<&std::path::Path>) -> Result<Preferences, Error> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Preferences::default_path()?,
    };
    Preferences::load_or_init(&path)
}

/// Assemble the job: QR code, barcode, text lines, then picture.
fn build_job(cli: &Cli, prefs: &Preferences) -> Result<LabelJob, Error> {
    let capability =
        Capability::LABELMANAGER_PNP.with_margin(cli.margin.unwrap_or(prefs.label.margin));
    let font = cli
        .user_font
        .clone()
        .unwrap_or_else(|| prefs.fonts.get(cli.style).to_string());

    let mut job = LabelJob::new(capability)
        .font(font)
        .frame(cli.frame as usize)
        .gutter(prefs.label.gutter);

    if let Some(payload) = &cli.qr {
        job = job.push(Element::QrCode(QrCode::new(payload.as_str())));
    }
    if let Some([symbology, payload]) = cli.barcode.as_deref() {
        let symbology: Symbology = symbology.parse()?;
        job = job.push(Element::Barcode(Barcode::new(symbology, payload.as_str())));
    }
    for line in &cli.text {
        job = job.push(Element::Text(TextLine::new(line.as_str())));
    }
    if let Some(path) = &cli.picture {
        let mode = if cli.dither {
            Monochrome::Bayer
        } else {
            prefs.label.dither
        };
        job = job.push(Element::Image(Picture::new(path).mode(mode)));
    }
    if let Some(path) = &cli.preview {
        job = job.preview(path);
    }
    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        let args = std::iter::once("dymoprint").chain(args.iter().copied()).map(OsString::from);
        Cli::try_parse_from(normalize_args(args)).unwrap()
    }

    fn kinds(job: &LabelJob) -> Vec<&'static str> {
        job.elements
            .iter()
            .map(|e| match e {
                Element::Text(_) => "text",
                Element::Barcode(_) => "barcode",
                Element::QrCode(_) => "qr",
                Element::Image(_) => "image",
            })
            .collect()
    }

    #[test]
    fn test_legacy_qr_flag() {
        let cli = parse(&["-qr", "Tst"]);
        assert_eq!(cli.qr.as_deref(), Some("Tst"));
        assert!(cli.text.is_empty());

        let job = build_job(&cli, &Preferences::default()).unwrap();
        assert_eq!(kinds(&job), vec!["qr"]);
    }

    #[test]
    fn test_each_argument_is_one_line() {
        let cli = parse(&["Hello World", "second"]);
        let job = build_job(&cli, &Preferences::default()).unwrap();
        assert_eq!(
            job.elements,
            vec![
                Element::Text(TextLine::new("Hello World")),
                Element::Text(TextLine::new("second")),
            ]
        );
    }

    #[test]
    fn test_element_order() {
        let cli = parse(&["-p", "pic.png", "text", "-c", "code128", "ABC", "--qr", "q"]);
        let job = build_job(&cli, &Preferences::default()).unwrap();
        assert_eq!(kinds(&job), vec!["qr", "barcode", "text", "image"]);
    }

    #[test]
    fn test_unknown_symbology() {
        let cli = parse(&["-c", "pzn", "123"]);
        assert!(matches!(
            build_job(&cli, &Preferences::default()),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_options() {
        let cli = parse(&["-f", "-f", "-s", "b", "-m", "10", "--dither", "-p", "x.png", "t"]);
        let mut prefs = Preferences::default();
        prefs.fonts.bold = "builtin".to_string();
        let job = build_job(&cli, &prefs).unwrap();

        assert_eq!(job.frame, 2);
        assert_eq!(job.font, "builtin");
        assert_eq!(job.capability.margin_lines, 10);
        match &job.elements[1] {
            Element::Image(picture) => assert_eq!(picture.mode, Monochrome::Bayer),
            other => panic!("unexpected element {:?}", other),
        }
    }

    #[test]
    fn test_user_font_overrides_style() {
        let cli = parse(&["-s", "i", "-u", "/fonts/Mine.ttf", "t"]);
        let job = build_job(&cli, &Preferences::default()).unwrap();
        assert_eq!(job.font, "/fonts/Mine.ttf");
    }

    #[test]
    fn test_margin_default_from_preferences() {
        let cli = parse(&["t"]);
        let mut prefs = Preferences::default();
        prefs.label.margin = 30;
        let job = build_job(&cli, &prefs).unwrap();
        assert_eq!(job.capability.margin_lines, 30);
    }
}
