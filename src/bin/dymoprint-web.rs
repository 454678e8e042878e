//! # dymoprint web form
//!
//! Serves a page with a single text field; submitting it prints the text
//! as a one-line label.
//!
//! ```bash
//! dymoprint-web --listen 0.0.0.0:5000
//! ```

use std::path::PathBuf;

use clap::Parser;

use dymoprint::{
    Capability, Error, HidTransport,
    config::{FontStyle, Preferences},
    server::{ServerConfig, serve},
};

/// dymoprint-web - Print labels from a browser
#[derive(Parser, Debug)]
#[command(name = "dymoprint-web")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:5000")]
    listen: String,

    /// hidraw device node (found automatically when omitted)
    #[arg(long, value_name = "PATH")]
    device: Option<PathBuf>,

    /// Preferences file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Error> {
    let cli = Cli::parse();

    let prefs_path = match cli.config {
        Some(path) => path,
        None => Preferences::default_path()?,
    };
    let prefs = Preferences::load_or_init(&prefs_path)?;

    let capability = Capability::LABELMANAGER_PNP.with_margin(prefs.label.margin);
    let transport = match cli.device.or(prefs.device.path.clone()) {
        Some(path) => HidTransport::new(path, &capability),
        None => HidTransport::auto(&capability),
    };

    let config = ServerConfig {
        listen_addr: cli.listen,
        capability,
        font: prefs.fonts.get(FontStyle::Regular).to_string(),
        gutter: prefs.label.gutter,
    };
    serve(config, Box::new(transport)).await
}
