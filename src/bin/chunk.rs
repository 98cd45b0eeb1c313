//! Minimal demo CLI that segments a file (or stdin) and prints segment
//! boundaries. Not part of the library's required surface — a thin
//! exerciser for manual testing, in the style of `rdiff-rust`'s own
//! `main.rs` + `opts.rs`.

use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use fletchseg::{ChunkerConfig, Segmenter};

/// Split a byte stream into content-defined segments and print their sizes.
#[derive(Parser)]
#[clap(name = "fletchseg", version = "0.1.0")]
struct Opts {
    /// File to segment. Reads from stdin when omitted.
    #[clap(name = "INPUT_FILE", parse(from_os_str))]
    input_file: Option<PathBuf>,

    /// MINSEGSIZE_BITS: minimum segment size is `1 << bits` bytes (8..=25).
    #[clap(long, default_value_t = fletchseg::config::DEFAULT_MINSEGSIZE_BITS)]
    minsegsize_bits: u8,
}

fn main() {
    tracing_subscriber::fmt::init();

    let opts = Opts::parse();
    if let Err(err) = run(opts) {
        eprintln!("fletchseg: {err}");
        std::process::exit(1);
    }
}

fn run(opts: Opts) -> Result<(), Box<dyn std::error::Error>> {
    let config = ChunkerConfig::new(opts.minsegsize_bits)?;
    let input = open_input(opts.input_file.as_deref())?;
    let mut segmenter = Segmenter::with_config(input, config)?;

    let mut index = 0u64;
    let mut total_bytes = 0u64;
    while let Some(segment) = segmenter.read_segment()? {
        println!("segment {index}: {} bytes", segment.len());
        total_bytes += segment.len() as u64;
        index += 1;
    }
    println!("{index} segments, {total_bytes} bytes total");

    Ok(())
}

fn open_input(path: Option<&std::path::Path>) -> io::Result<Box<dyn Read>> {
    match path {
        Some(path) => Ok(Box::new(File::open(path).map_err(|err| {
            io::Error::new(err.kind(), format!("cannot open {path:?}: {err}"))
        })?)),
        None => Ok(Box::new(io::stdin())),
    }
}
