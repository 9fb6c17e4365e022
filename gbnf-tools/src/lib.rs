//! Shared plumbing for the grammar tools. Each binary is a thin wrapper
//! around [`run`]: it picks the transformation for its pipeline and handles
//! the exit code. Grammar problems are warnings on stderr and do not affect
//! the exit status; only I/O failures do.

use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use gbnf::{read_grammar, write_grammar, DiagnosticSink, Grammar};

/// Options shared by every grammar tool.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Options {
    /// Grammar to process; standard input when omitted.
    #[arg(long)]
    pub input: Option<PathBuf>,
}

/// A transformation slotted between the reader and the writer.
pub type Transform = fn(&mut Grammar, &mut DiagnosticSink);

/// Failure at the tool boundary. Grammar-level problems never end up here;
/// they are diagnostics.
#[derive(Debug)]
pub enum ToolError {
    Io(io::Error),
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolError::Io(cause) => write!(f, "i/o error: {}", cause),
        }
    }
}

impl From<io::Error> for ToolError {
    fn from(cause: io::Error) -> Self {
        ToolError::Io(cause)
    }
}

/// Reads the grammar named by `options`, applies `transform` when one is
/// given, and writes the canonical result to stdout. Diagnostics go to
/// stderr.
pub fn run(options: &Options, transform: Option<Transform>) -> Result<(), ToolError> {
    let input = match &options.input {
        Some(path) => fs::read(path)?,
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            buffer
        }
    };

    let mut diagnostics = DiagnosticSink::new();
    let mut grammar = read_grammar(&input, &mut diagnostics);
    if let Some(transform) = transform {
        transform(&mut grammar, &mut diagnostics);
    }
    diagnostics.drain_to(io::stderr())?;

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    write_grammar(&grammar, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Binary entry point: parse options, run the pipeline, map failures to
/// exit code 1.
pub fn main_with(transform: Option<Transform>) {
    env_logger::init();
    let options = Options::parse();
    if let Err(error) = run(&options, transform) {
        eprintln!("error: {}", error);
        process::exit(1);
    }
}
