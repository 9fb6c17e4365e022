//! Non-fatal diagnostics.
//!
//! Every error the tools can encounter is a warning: the offending input is
//! repaired locally and processing continues. Diagnostics are collected in a
//! sink rather than written straight to stderr, so tests can assert on them;
//! the front ends drain the sink when a phase completes.

use std::fmt;
use std::io::{self, Write};

/// One diagnostic message, attributed to a source line when one is known.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    message: String,
    line: Option<u32>,
}

impl Diagnostic {
    /// The message text, without decoration.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The attributed source line, if any.
    pub fn line(&self) -> Option<u32> {
        self.line
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, " >>{} on line {}<<", self.message, line),
            None => write!(f, " >>{}<<", self.message),
        }
    }
}

/// Collector of diagnostics, in emission order.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic.
    pub fn emit(&mut self, message: impl Into<String>, line: Option<u32>) {
        self.diagnostics.push(Diagnostic {
            message: message.into(),
            line,
        });
    }

    /// Iterates over the collected diagnostics.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    /// Checks whether a diagnostic with exactly this message was emitted.
    pub fn contains(&self, message: &str) -> bool {
        self.diagnostics.iter().any(|d| d.message == message)
    }

    /// Returns the number of collected diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Checks whether nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Writes out and forgets every collected diagnostic.
    pub fn drain_to<W: Write>(&mut self, mut out: W) -> io::Result<()> {
        for diagnostic in self.diagnostics.drain(..) {
            writeln!(out, "{}", diagnostic)?;
        }
        Ok(())
    }
}
