//! mkv2xml - Matroska to XML converter
//!
//! Writes the element tree of a Matroska file as XML.  Blocks show their track, absolute timecode in seconds and frame data in hex; subtitles are kept as UTF-8 text.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use matroska_xml::{convert, XmlOptions};

#[derive(Parser)]
#[command(name = "mkv2xml")]
#[command(about = "Dump the element tree of a Matroska file as XML")]
#[command(version)]
struct Cli {
    /// Matroska file to read (stdin when omitted)
    input: Option<PathBuf>,

    /// Write every element, including seek data, padding and checksums
    #[arg(short, long, conflicts_with = "no_cluster")]
    verbose: bool,

    /// Replace clusters with standalone <block> elements
    #[arg(short = 'C', long)]
    no_cluster: bool,

    /// Hex characters per line of binary data (0 disables wrapping)
    #[arg(long, env = "CHUNKLENGTH", default_value_t = 64)]
    chunk_length: usize,

    /// Additional element names to leave out
    #[arg(long = "deny", value_name = "NAME")]
    deny: Vec<String>,
}

impl Cli {
    fn options(&self) -> XmlOptions {
        let options = if self.verbose {
            XmlOptions::verbose()
        } else if self.no_cluster {
            XmlOptions::no_cluster()
        } else {
            XmlOptions::default()
        };
        options
            .with_chunk_length(self.chunk_length)
            .deny(self.deny.iter().cloned())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let options = cli.options();

    let source: Box<dyn Read> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let stdout = io::stdout();
    convert(source, BufWriter::new(stdout.lock()), options).context("Conversion failed")?;

    Ok(())
}
